//! Placement parsers: pure functions from target geometry + config to the
//! inline styles of one overlay element.
//!
//! - `spotlight`: a padded rectangle over the target
//! - `arrow`: a CSS border triangle pointing at the target
//! - `popup`: the dialog box, with viewport-fit detection, a fallback
//!   cascade through [`Position::ALL`](crate::types::Position::ALL) and a
//!   scroll offset that brings popup and target into view

pub mod arrow;
pub mod popup;
pub mod spotlight;

pub use arrow::arrow_styles;
pub use popup::{PopupParser, PopupPlacement};
pub use spotlight::spotlight_styles;
