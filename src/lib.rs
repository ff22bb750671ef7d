//! Interactive rectangle selection for cropping images that may be larger than
//! the screen.
//!
//! A [`SelectionSession`] scales the source into a viewport, turns pointer and
//! key events into a display-space rectangle, and resolves the confirmed
//! rectangle into source-image pixels. Rendering and input capture belong to
//! the host; the library never touches a window.

pub mod config;
pub mod error;
pub mod geometry;
pub mod image_ops;
pub mod resolve;
pub mod scale;
pub mod selection;
pub mod session;

pub use error::{Error, Result};
pub use geometry::{CropBox, Point, SelectionRect};
pub use image_ops::{CropTarget, ResampleFilter, preview_image};
pub use resolve::resolve;
pub use scale::{ScaleResult, Viewport, compute_scale};
pub use selection::{
    InteractionState, Key, Modifiers, MoveModifier, PointerButton, SelectionEvent,
};
pub use session::{
    SelectionSession, SessionOutcome, SourceImage, Transition, run_selection_session,
};
