//! Strongly-typed geometry primitives for the placement engine.
//!
//! Everything here is expressed in CSS pixels in *document* coordinates
//! (viewport coordinates plus the current scroll position), y growing down.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A length in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Px(pub f64);

impl Px {
    pub const ZERO: Px = Px(0.0);

    /// Round toward negative infinity (CSS `Math.floor`).
    #[inline]
    pub fn floor(self) -> Px {
        Px(self.0.floor())
    }

    /// Round toward positive infinity (CSS `Math.ceil`).
    #[inline]
    pub fn ceil(self) -> Px {
        Px(self.0.ceil())
    }

    #[inline]
    pub fn min(self, other: Px) -> Px {
        Px(self.0.min(other.0))
    }

    #[inline]
    pub fn max(self, other: Px) -> Px {
        Px(self.0.max(other.0))
    }

    /// Get the raw value (use sparingly, prefer typed operations)
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Add for Px {
    type Output = Px;
    fn add(self, rhs: Px) -> Px { Px(self.0 + rhs.0) }
}
impl Sub for Px {
    type Output = Px;
    fn sub(self, rhs: Px) -> Px { Px(self.0 - rhs.0) }
}
impl Mul<f64> for Px {
    type Output = Px;
    fn mul(self, rhs: f64) -> Px { Px(self.0 * rhs) }
}
impl Div<f64> for Px {
    type Output = Px;
    fn div(self, rhs: f64) -> Px { Px(self.0 / rhs) }
}
impl Neg for Px {
    type Output = Px;
    fn neg(self) -> Px { Px(-self.0) }
}
impl AddAssign for Px {
    fn add_assign(&mut self, rhs: Px) {
        self.0 += rhs.0;
    }
}
impl SubAssign for Px {
    fn sub_assign(&mut self, rhs: Px) {
        self.0 -= rhs.0;
    }
}

impl From<f64> for Px {
    fn from(value: f64) -> Self {
        Px(value)
    }
}

/// Renders the bare number the way a browser stringifies it: `382`, `50.5`.
/// Negative zero prints as `0`.
impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            write!(f, "0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Axis-aligned rectangle of an element, in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Build from a top-left corner (`x` = left, `y` = top) and a size.
    pub fn from_origin_size(origin: DVec2, size: DVec2) -> Self {
        Bounds { min: origin, max: origin + size }
    }

    /// Convenience constructor taking `top, left, width, height`
    /// in the order CSS people usually think about them.
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self::from_origin_size(DVec2::new(left, top), DVec2::new(width, height))
    }

    pub fn top(&self) -> Px { Px(self.min.y) }
    pub fn left(&self) -> Px { Px(self.min.x) }
    pub fn bottom(&self) -> Px { Px(self.max.y) }
    pub fn right(&self) -> Px { Px(self.max.x) }
    pub fn width(&self) -> Px { Px(self.max.x - self.min.x) }
    pub fn height(&self) -> Px { Px(self.max.y - self.min.y) }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

/// Scroll request in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScrollOffset {
    pub top: Px,
    pub left: Px,
}

impl ScrollOffset {
    pub const ORIGIN: ScrollOffset = ScrollOffset { top: Px::ZERO, left: Px::ZERO };

    pub fn new(top: Px, left: Px) -> Self {
        ScrollOffset { top, left }
    }
}

/// Where the popup sits relative to its target.
///
/// Declaration order is load-bearing: it is the fallback cascade order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Top,
    TopLeft,
    Left,
    BottomLeft,
    Bottom,
    BottomRight,
    Right,
    TopRight,
    #[default]
    Center,
}

impl Position {
    /// Every position, in cascade order.
    pub const ALL: [Position; 9] = [
        Position::Top,
        Position::TopLeft,
        Position::Left,
        Position::BottomLeft,
        Position::Bottom,
        Position::BottomRight,
        Position::Right,
        Position::TopRight,
        Position::Center,
    ];

    /// Index of this position in [`Position::ALL`].
    pub fn ordinal(self) -> usize {
        Position::ALL
            .iter()
            .position(|p| *p == self)
            .unwrap_or(Position::ALL.len() - 1)
    }

    /// Next position to try when this one does not fit.
    ///
    /// Wraps around and never yields `Center`.
    pub fn next_fallback(self) -> Position {
        let count = Position::ALL.len();
        let mut next = Position::ALL[(self.ordinal() + 1) % count];
        if next == Position::Center {
            next = Position::ALL[(next.ordinal() + 1) % count];
        }
        next
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Position::Top => "TOP",
            Position::TopLeft => "TOP_LEFT",
            Position::Left => "LEFT",
            Position::BottomLeft => "BOTTOM_LEFT",
            Position::Bottom => "BOTTOM",
            Position::BottomRight => "BOTTOM_RIGHT",
            Position::Right => "RIGHT",
            Position::TopRight => "TOP_RIGHT",
            Position::Center => "CENTER",
        };
        f.write_str(name)
    }
}
