//! # nain-core
//!
//! Core types and primitives for the NAIN site engine.
//! This crate contains the foundational types shared across all NAIN crates:
//! frame buffers, colors, geometry, durations, site configuration and error types.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod math;
pub mod time;

pub use config::*;

pub use color::{Color, ColorError};
pub use error::{NainError, NainResult};
pub use frame::FrameBuffer;
pub use math::{effective_pixel_ratio, Point2D, Rect, Size2D};
pub use time::{Duration, FrameClock};
