//! Measurer: load an image, draw a reference line of known length and a
//! measure line, and get the measure line's real-world length by scaling.
//!
//! The geometry, state machine and calculator are plain functions over plain
//! data and can be used without any UI. `app` and `canvas` wire them into an
//! eframe window.

pub mod app;
pub mod calculator;
pub mod canvas;
pub mod config;
pub mod draw_state;
pub mod error;
pub mod geometry;
pub mod image_loader;
pub mod render;
pub mod session;

pub use draw_state::{DrawState, Effect, MeasurementContext};
pub use error::{MeasureError, Result};
pub use geometry::{LineKind, Segment};
pub use session::Session;
