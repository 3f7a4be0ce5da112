//! Loading a frame sequence from the public directory.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use nain_core::{FrameBuffer, NainResult};
use nain_motion::{FramePath, FrameSet};
use rayon::prelude::*;

/// Map a site URL path such as `/sequence/02/frame_0007.png` onto the
/// directory the site is served from.
pub fn resolve_asset(public_dir: &Path, url_path: &str) -> PathBuf {
    public_dir.join(url_path.trim_start_matches('/'))
}

/// Decode frames `0..count` in parallel, handing each result to `on_complete`
/// as soon as it is available. Completion order is not index order.
pub fn load_frames<F>(public_dir: &Path, path: &FramePath, count: usize, mut on_complete: F)
where
    F: FnMut(usize, NainResult<FrameBuffer>),
{
    let (tx, rx) = mpsc::channel();
    std::thread::scope(|scope| {
        scope.spawn(move || {
            (0..count).into_par_iter().for_each_with(tx, |tx, index| {
                let file = resolve_asset(public_dir, &path.path_for(index));
                tracing::debug!("decoding frame {} from {}", index, file.display());
                // The receiver outlives the scope.
                let _ = tx.send((index, crate::load_image(&file)));
            });
        });
        for (index, result) in rx.iter() {
            on_complete(index, result);
        }
    });
}

/// Load a whole sequence into a [`FrameSet`]. A missing or undecodable frame
/// leaves the set in its failed state rather than returning an error.
pub fn load_frame_set(
    public_dir: &Path,
    path: &FramePath,
    count: usize,
) -> NainResult<FrameSet<FrameBuffer>> {
    let mut set = FrameSet::new(count);
    let mut outcome = Ok(());
    load_frames(public_dir, path, count, |index, result| match result {
        Ok(frame) => {
            if let Err(e) = set.complete(index, frame) {
                outcome = Err(e);
            }
        }
        Err(e) => {
            set.fail(index, e.to_string());
        }
    });
    outcome?;
    Ok(set)
}

/// Summary of a sequence on disk.
#[derive(Debug, Clone, Default)]
pub struct SequenceReport {
    pub count: usize,
    pub loaded: usize,
    /// Frames that failed to load, with the reason.
    pub failures: Vec<(usize, String)>,
    /// Dimensions of frame 0, when it loaded.
    pub dimensions: Option<(u32, u32)>,
    /// Frames whose dimensions differ from frame 0.
    pub mismatched: Vec<usize>,
}

impl SequenceReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.loaded == self.count
    }
}

/// Decode every frame and report all problems, not just the first.
pub fn inspect_sequence(public_dir: &Path, path: &FramePath, count: usize) -> SequenceReport {
    let results: Vec<(usize, NainResult<(u32, u32)>)> = (0..count)
        .into_par_iter()
        .map(|index| {
            let file = resolve_asset(public_dir, &path.path_for(index));
            let dims = crate::load_image(&file).map(|fb| (fb.width, fb.height));
            (index, dims)
        })
        .collect();

    let mut report = SequenceReport {
        count,
        ..SequenceReport::default()
    };
    for (index, result) in results {
        match result {
            Ok(dims) => {
                report.loaded += 1;
                match report.dimensions {
                    None if index == 0 => report.dimensions = Some(dims),
                    Some(first) if first != dims => report.mismatched.push(index),
                    _ => {}
                }
            }
            Err(e) => report.failures.push((index, e.to_string())),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_strips_leading_slash() {
        let root = Path::new("/srv/public");
        assert_eq!(
            resolve_asset(root, "/sequence/02/frame_0007.png"),
            PathBuf::from("/srv/public/sequence/02/frame_0007.png")
        );
        assert_eq!(
            resolve_asset(root, "work/01.jpg"),
            PathBuf::from("/srv/public/work/01.jpg")
        );
    }

    #[test]
    fn test_missing_directory_fails_set() {
        let path = FramePath::new("/nowhere/frame_", 4, "png");
        let set = load_frame_set(Path::new("/nonexistent"), &path, 3).unwrap();
        assert!(!set.is_ready());
        assert!(matches!(
            set.state(),
            nain_motion::LoadState::Failed { .. }
        ));
    }

    #[test]
    fn test_empty_sequence() {
        let path = FramePath::new("/f_", 4, "png");
        let report = inspect_sequence(Path::new("/nonexistent"), &path, 0);
        assert_eq!(report.count, 0);
        assert!(report.is_complete());
    }
}
