//! The preloaded frames of a scroll sequence.
//!
//! A [`FrameSet`] is all-or-nothing: frames are only handed out once every
//! slot has been filled. Loads complete in any order and are reported through
//! [`FrameSet::complete`] / [`FrameSet::fail`].

use std::fmt;

use nain_core::{FrameBuffer, NainError, NainResult, SequenceConfig, Size2D};
use serde::{Deserialize, Serialize};

/// Anything the player can letterbox onto a surface.
pub trait FrameImage {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn size(&self) -> Size2D {
        Size2D::new(self.width() as f64, self.height() as f64)
    }
}

impl FrameImage for FrameBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// `{base}{index:0pad}.{ext}`, e.g. `/sequence/02/frame_0007.png`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePath {
    pub base: String,
    pub pad: usize,
    pub ext: String,
}

impl FramePath {
    pub fn new(base: impl Into<String>, pad: usize, ext: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            pad,
            ext: ext.into(),
        }
    }

    pub fn path_for(&self, index: usize) -> String {
        format!(
            "{}{:0width$}.{}",
            self.base,
            index,
            self.ext,
            width = self.pad
        )
    }

    /// Paths for frames `0..count`, in order.
    pub fn paths(&self, count: usize) -> impl Iterator<Item = String> + '_ {
        (0..count).map(move |i| self.path_for(i))
    }
}

impl From<&SequenceConfig> for FramePath {
    fn from(config: &SequenceConfig) -> Self {
        FramePath::new(config.base_path.clone(), config.pad, config.ext.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    Loading { loaded: usize, total: usize },
    Ready,
    /// A frame could not be loaded. Terminal: the set never becomes ready.
    Failed { index: usize, reason: String },
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Loading { loaded, total } => write!(f, "loading ({}/{})", loaded, total),
            LoadState::Ready => write!(f, "ready"),
            LoadState::Failed { index, reason } => {
                write!(f, "failed at frame {}: {}", index, reason)
            }
        }
    }
}

/// What a single completion did to the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadEvent {
    Progress { loaded: usize, total: usize },
    /// The last missing frame arrived. Emitted exactly once.
    Ready,
    Failed,
    /// Duplicate completion, or one arriving after the set already failed.
    Ignored,
}

#[derive(Debug)]
pub struct FrameSet<F> {
    slots: Box<[Option<F>]>,
    loaded: usize,
    failure: Option<(usize, String)>,
}

impl<F> FrameSet<F> {
    /// An empty set with `count` slots.
    pub fn new(count: usize) -> Self {
        Self {
            slots: (0..count).map(|_| None).collect(),
            loaded: 0,
            failure: None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn is_ready(&self) -> bool {
        self.failure.is_none() && !self.slots.is_empty() && self.loaded == self.slots.len()
    }

    pub fn state(&self) -> LoadState {
        if let Some((index, reason)) = &self.failure {
            LoadState::Failed {
                index: *index,
                reason: reason.clone(),
            }
        } else if self.is_ready() {
            LoadState::Ready
        } else {
            LoadState::Loading {
                loaded: self.loaded,
                total: self.slots.len(),
            }
        }
    }

    /// Store the decoded frame for `index`.
    pub fn complete(&mut self, index: usize, frame: F) -> NainResult<LoadEvent> {
        let total = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(NainError::FrameOutOfRange {
                index,
                count: total,
            })?;
        if self.failure.is_some() || slot.is_some() {
            return Ok(LoadEvent::Ignored);
        }
        *slot = Some(frame);
        self.loaded += 1;

        if self.loaded == total {
            tracing::info!("frame sequence ready ({} frames)", total);
            Ok(LoadEvent::Ready)
        } else {
            Ok(LoadEvent::Progress {
                loaded: self.loaded,
                total,
            })
        }
    }

    /// Record that `index` could not be loaded. Only the first failure is kept.
    pub fn fail(&mut self, index: usize, reason: impl Into<String>) -> LoadEvent {
        let filled = self.slots.get(index).map_or(true, Option::is_some);
        if filled || self.failure.is_some() || self.is_ready() {
            return LoadEvent::Ignored;
        }
        let reason = reason.into();
        tracing::warn!(
            "frame {} failed to load, sequence will not play: {}",
            index,
            reason
        );
        self.failure = Some((index, reason));
        LoadEvent::Failed
    }

    /// The frame at `index`, only once the whole set is ready.
    pub fn get(&self, index: usize) -> Option<&F> {
        if !self.is_ready() {
            return None;
        }
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Indices that have not completed yet.
    pub fn missing(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| i)
            .collect()
    }
}
