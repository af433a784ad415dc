//! Built-in defaults (CSS pixels unless noted)

use std::time::Duration;

pub const ARROW_SIZE: f64 = 16.0;
/// Gap between the target and the popup.
pub const POPUP_MARGIN: f64 = ARROW_SIZE * 2.0;
pub const POPUP_MIN_HEIGHT: f64 = 350.0;
pub const POPUP_MAX_HEIGHT: f64 = 450.0;
pub const POPUP_MIN_WIDTH: f64 = 350.0;
pub const POPUP_MAX_WIDTH: f64 = 450.0;
pub const SPOTLIGHT_PADDING: f64 = 0.0;
pub const SPOTLIGHT_TRANSITION: &str = "height 0.7s, width 0.7s, top 0.7s, left 0.7s";
/// Where the spotlight hides when a step has no target.
pub const HIDDEN_OFFSET: f64 = -9999.0;

pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(300);
pub const SCROLL_END_DEBOUNCE: Duration = Duration::from_millis(150);
