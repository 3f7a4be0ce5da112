//! Work gallery layout and the lightbox navigator.

use nain_core::MediaItem;
use serde::Serialize;

/// Column spans of consecutive tiles on the 6-column grid. Repeats.
pub const SPAN_PATTERN: [u8; 14] = [3, 3, 2, 2, 2, 4, 2, 3, 3, 2, 4, 2, 2, 2];

/// Every tile is two grid rows tall.
pub const TILE_ROWS: u8 = 2;

/// Tiles this close to the top of the page are loaded eagerly.
const PRIORITY_TILES: usize = 6;

pub fn tile_span(position: usize) -> u8 {
    SPAN_PATTERN[position % SPAN_PATTERN.len()]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryTile {
    #[serde(flatten)]
    pub item: MediaItem,
    pub columns: u8,
    pub rows: u8,
    pub priority: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Gallery {
    items: Vec<MediaItem>,
}

impl Gallery {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items with their resolved grid placement, in display order.
    pub fn tiles(&self) -> Vec<GalleryTile> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| GalleryTile {
                columns: item.span.unwrap_or_else(|| tile_span(i)),
                rows: TILE_ROWS,
                priority: i < PRIORITY_TILES,
                item: item.clone(),
            })
            .collect()
    }

    pub fn lightbox(&self) -> Lightbox {
        Lightbox::new(self.items.len())
    }
}

/// Which gallery item, if any, is shown full-screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lightbox {
    len: usize,
    active: Option<usize>,
}

impl Lightbox {
    pub fn new(len: usize) -> Self {
        Self { len, active: None }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Open at `index`. Out-of-range indices are ignored.
    pub fn open(&mut self, index: usize) {
        if index < self.len {
            self.active = Some(index);
        }
    }

    pub fn close(&mut self) {
        self.active = None;
    }

    pub fn next(&mut self) {
        if let Some(i) = self.active {
            self.active = Some((i + 1) % self.len);
        }
    }

    pub fn prev(&mut self) {
        if let Some(i) = self.active {
            self.active = Some((i + self.len - 1) % self.len);
        }
    }

    /// Apply a `KeyboardEvent.key` value. Returns whether the key was
    /// consumed; keys are only consumed while open.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            "Escape" => self.close(),
            "ArrowRight" => self.next(),
            "ArrowLeft" => self.prev(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nain_core::{default_work, MediaKind};

    #[test]
    fn test_span_pattern_repeats() {
        for i in 0..SPAN_PATTERN.len() {
            assert_eq!(tile_span(i), tile_span(i + 14));
            assert_eq!(tile_span(i), tile_span(i + 28));
        }
        assert_eq!(tile_span(0), 3);
        assert_eq!(tile_span(5), 4);
        assert_eq!(tile_span(15), 3);
    }

    #[test]
    fn test_tiles_resolve_spans() {
        let mut items = default_work();
        items[1].span = Some(6);
        let tiles = Gallery::new(items).tiles();
        assert_eq!(tiles.len(), 16);
        assert_eq!(tiles[0].columns, 3);
        assert_eq!(tiles[1].columns, 6);
        assert_eq!(tiles[14].columns, 3);
        assert!(tiles.iter().all(|t| t.rows == 2));
        assert!(tiles[5].priority);
        assert!(!tiles[6].priority);
    }

    #[test]
    fn test_tile_serializes_flat() {
        let tiles = Gallery::new(default_work()).tiles();
        let json = serde_json::to_value(&tiles[0]).unwrap();
        assert_eq!(json["id"], "01");
        assert_eq!(json["kind"], "video");
        assert_eq!(json["columns"], 3);
        assert_eq!(tiles[0].item.kind, MediaKind::Video);
    }

    #[test]
    fn test_lightbox_wraps_both_ways() {
        let mut lb = Lightbox::new(3);
        lb.open(2);
        lb.next();
        assert_eq!(lb.active(), Some(0));
        lb.prev();
        assert_eq!(lb.active(), Some(2));
        lb.prev();
        assert_eq!(lb.active(), Some(1));
    }

    #[test]
    fn test_lightbox_closed_is_inert() {
        let mut lb = Lightbox::new(3);
        lb.next();
        lb.prev();
        assert_eq!(lb.active(), None);
        assert!(!lb.handle_key("ArrowRight"));
        lb.open(3);
        assert!(!lb.is_open());
    }

    #[test]
    fn test_lightbox_keys() {
        let mut lb = Gallery::new(default_work()).lightbox();
        lb.open(0);
        assert!(lb.handle_key("ArrowLeft"));
        assert_eq!(lb.active(), Some(15));
        assert!(lb.handle_key("ArrowRight"));
        assert_eq!(lb.active(), Some(0));
        assert!(!lb.handle_key("Enter"));
        assert!(lb.handle_key("Escape"));
        assert!(!lb.is_open());
    }
}
