//! # nain-render
//!
//! Native backend for the NAIN site engine. Decodes sequence frames from disk
//! in parallel, draws them through the same [`nain_motion::SequencePlayer`]
//! the browser uses, onto a CPU [`RasterSurface`], and exports still previews.

pub mod image_loader;
pub mod preview;
pub mod raster;
pub mod sequence;

pub use image_loader::{encode_png, load_image, save_png};
pub use preview::{render_preview, PreviewOptions};
pub use raster::RasterSurface;
pub use sequence::{inspect_sequence, load_frame_set, load_frames, resolve_asset, SequenceReport};
