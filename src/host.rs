//! The seam between the engine and whatever renders the page.
//!
//! A host is two things: a [`Document`] the engine reads geometry and
//! visibility from, and a [`Surface`] that performs the side effects the
//! engine decides on. Anything that implements both is a [`Host`].

use std::fmt;

use glam::DVec2;

use crate::step::StepComponent;
use crate::style::StyleProps;
use crate::types::{Bounds, ScrollOffset};

/// Read access to the page.
pub trait Document {
    /// Handle to a live element. Cheap to clone, compared by identity.
    type Element: Clone + PartialEq + fmt::Debug;

    /// First element matching `selector`, if any.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// Viewport-relative border box. `None` when the element has no client
    /// rects (e.g. `display: none`).
    fn bounding_client_rect(&self, element: &Self::Element) -> Option<Bounds>;

    /// Current document scroll position (`x` = scrollX, `y` = scrollY).
    fn scroll_position(&self) -> DVec2;

    /// Computed CSS `position` of the element (`static`, `fixed`, ...).
    fn computed_position(&self, element: &Self::Element) -> Option<String>;

    /// Parent element, or `None` once the walk reaches `<body>`.
    fn parent_element(&self, element: &Self::Element) -> Option<Self::Element>;

    /// CSS-level visibility: `display`, `visibility` and `opacity` all allow
    /// the element to be seen.
    fn check_visibility(&self, element: &Self::Element) -> bool;
}

/// The three overlay elements the engine positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayPart {
    Spotlight,
    Popup,
    Arrow,
}

impl fmt::Display for OverlayPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayPart::Spotlight => write!(f, "spotlight"),
            OverlayPart::Popup => write!(f, "popup"),
            OverlayPart::Arrow => write!(f, "arrow"),
        }
    }
}

/// A side effect requested by the engine, performed by the host in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Attach the overlay (spotlight, popup, arrow) to the page.
    Mount,
    /// Remove the overlay and everything rendered into it.
    Unmount,
    /// Remove every inline style from an overlay element.
    ClearStyles(OverlayPart),
    /// Set the given inline styles, leaving other properties alone.
    ApplyStyles(OverlayPart, StyleProps),
    /// Smooth-scroll the document.
    ScrollTo(ScrollOffset),
    /// Replace the popup's content with a freshly rendered step component.
    RenderContent(StepComponent),
}

/// Write access to the page, plus the measurements that only make sense
/// after effects have been applied.
pub trait Surface {
    fn dispatch(&mut self, effect: Effect);

    /// `documentElement.clientWidth` / `clientHeight`.
    fn viewport_size(&self) -> DVec2;

    /// Rendered size of the popup box with its current content and styles.
    fn popup_size(&self) -> DVec2;
}

pub trait Host: Document + Surface {}

impl<T: Document + Surface> Host for T {}
