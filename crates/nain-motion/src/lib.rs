//! # nain-motion
//!
//! Target-independent motion for the NAIN site engine. Everything in here is a
//! pure function of layout geometry and elapsed time, so it runs unchanged in
//! the browser (`nain-wasm`) and natively (`nain-render`, tests).
//!
//! Data flows one way:
//!
//! ```text
//! ProgressSampler -> Spring -> { FrameSelector + DrawSurface, Choreography }
//! ```
//!
//! with [`FrameSet`] gating whether the player may draw at all.

pub mod choreography;
pub mod frame_set;
pub mod gallery;
pub mod layer;
pub mod mapping;
pub mod player;
pub mod progress;
pub mod selector;
pub mod spring;
pub mod surface;

pub use choreography::{
    header_scrolled, Choreography, LayerProperty, LayerStyle, PhaseBounds, ScrollPhase, Track,
};
pub use frame_set::{FrameImage, FramePath, FrameSet, LoadEvent, LoadState};
pub use gallery::{Gallery, GalleryTile, Lightbox};
pub use layer::ScrollLayer;
pub use mapping::{MappingError, PiecewiseLinear};
pub use player::{PlayerOptions, SequencePlayer, Tick};
pub use progress::{Edge, ProgressSampler, ScrollOffset, SectionGeometry};
pub use selector::FrameSelector;
pub use spring::{Spring, SpringConfig};
pub use surface::{DrawSurface, Smoothing};
