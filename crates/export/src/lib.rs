//! Result rendering and PDF export.
//!
//! [`display`] flattens a finished session into a neutral model any target
//! can render; [`pdf`] turns that model into a deterministic, single-font
//! PDF document.

pub mod display;
pub mod pdf;

pub use display::{render, DisplayModel, UnitView};
pub use pdf::render_pdf;
