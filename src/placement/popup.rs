//! Popup placement with viewport-fit detection and fallback.
//!
//! A candidate position "cannot fit" when clamping it into the document
//! (top/left ≥ 0) would shrink the popup below its `min-height` or
//! `min-width`. Rejected candidates hand over to the next position in
//! [`Position::ALL`] order, skipping `Center` and wrapping. After
//! `Position::ALL.len()` rejections the popup is put at `Bottom`, forced.

use glam::DVec2;

use crate::config::{ArrowConfig, PopupConfig};
use crate::style::StyleProps;
use crate::types::{Bounds, Position, Px, ScrollOffset};

/// Result of a popup layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupPlacement {
    /// `top`, `left`, `max-height`, `max-width`, in px.
    pub style_props: StyleProps,
    /// Position actually used after the cascade.
    pub true_position: Position,
    /// Where to scroll so that popup and target are both in view.
    pub scroll_offset: ScrollOffset,
    /// Candidates evaluated, the accepted one included.
    pub attempts: usize,
}

/// Lays out the popup around one target.
#[derive(Debug, Clone)]
pub struct PopupParser {
    target: Bounds,
    /// Rendered popup size (`x` = width, `y` = height).
    size: DVec2,
    /// Top-left corner that centres the popup in the viewport.
    center: DVec2,
    viewport: DVec2,
    correction_top: Px,
    correction_left: Px,
    arrow_size: Px,
    margin: Px,
    min_size: DVec2,
    max_size: DVec2,
    position: Position,
    force_position: bool,
}

struct Candidate {
    top: Px,
    left: Px,
    /// How much of the popup is cut off above / left of the document.
    overflow: DVec2,
}

impl PopupParser {
    pub fn new(target: Bounds, popup: &PopupConfig, arrow: &ArrowConfig, size: DVec2, viewport: DVec2) -> Self {
        Self {
            target,
            size,
            center: crate::geometry::centered(viewport, size),
            viewport,
            correction_top: Px(popup.corrections.correction_top),
            correction_left: Px(popup.corrections.correction_left),
            arrow_size: Px(arrow.arrow_size),
            margin: Px(popup.effective_margin()),
            min_size: DVec2::new(popup.min_width(), popup.min_height()),
            max_size: DVec2::new(popup.max_width(), popup.max_height()),
            position: Position::Center,
            force_position: false,
        }
    }

    /// Requested position; `force` skips the fit test.
    #[must_use]
    pub fn position(mut self, position: Position, force: bool) -> Self {
        self.position = position;
        self.force_position = force;
        self
    }

    pub fn parse(&self) -> PopupPlacement {
        let mut position = self.position;
        let mut forced = self.force_position;
        let mut rejected = 0;
        let mut attempts = 0;

        loop {
            attempts += 1;
            let candidate = self.candidate(position);
            let fits = self.fits(&candidate);
            crate::log::trace!(%position, top = candidate.top.raw(), left = candidate.left.raw(), fits, "popup candidate");

            if fits || forced || position == Position::Center {
                return self.accept(position, candidate, attempts);
            }

            rejected += 1;
            if rejected == Position::ALL.len() {
                crate::log::warn!(requested = %self.position, "no popup position fits, forcing BOTTOM");
                position = Position::Bottom;
                forced = true;
            } else {
                position = position.next_fallback();
            }
        }
    }

    fn candidate(&self, position: Position) -> Candidate {
        let t = self.target.top();
        let l = self.target.left();
        let b = self.target.bottom();
        let r = self.target.right();
        let (ct, cl, m, a) = (self.correction_top, self.correction_left, self.margin, self.arrow_size);
        let h = Px(self.size.y);
        let w = Px(self.size.x);

        let above = (t + ct - h - m).ceil();
        let below = (b + ct + m).floor();
        let beside = (t + b - h) / 2.0 + ct;
        let centred = (l + r - w) / 2.0 + cl;
        let leaning_right = (l + r) / 2.0 - a * 2.0 + cl;
        let leaning_left = l - w + (r - l) / 2.0 + a * 2.0 + cl;

        let (top, left) = match position {
            Position::Top => (above, centred),
            Position::TopRight => (above, leaning_right),
            Position::Right => (beside, (r + m + cl).floor()),
            Position::BottomRight => (below, leaning_right),
            Position::Bottom => (below, centred),
            Position::BottomLeft => (below, leaning_left),
            Position::Left => (beside, (l - w - m + cl).ceil()),
            Position::TopLeft => (above, leaning_left),
            Position::Center => (Px(self.center.y) + ct, Px(self.center.x) + cl),
        };

        let overflow = DVec2::new((-left.raw()).max(0.0), (-top.raw()).max(0.0));
        Candidate { top, left, overflow }
    }

    fn fits(&self, candidate: &Candidate) -> bool {
        let visible = self.size - candidate.overflow;
        visible.y >= self.min_size.y && visible.x >= self.min_size.x
    }

    fn accept(&self, position: Position, candidate: Candidate, attempts: usize) -> PopupPlacement {
        let top = candidate.top.max(Px::ZERO);
        let left = candidate.left.max(Px::ZERO);
        let max_size = self.max_size - candidate.overflow;

        let style_props = StyleProps::from_values([
            ("top", top),
            ("left", left),
            ("max-height", Px(max_size.y)),
            ("max-width", Px(max_size.x)),
        ]);

        let scroll_offset = ScrollOffset::new(
            scroll_axis(
                top,
                Px(self.size.y),
                self.target.top(),
                self.target.bottom() + self.correction_top,
                Px(self.viewport.y),
            ),
            scroll_axis(
                left,
                Px(self.size.x),
                self.target.left(),
                self.target.right() + self.correction_left,
                Px(self.viewport.x),
            ),
        );

        PopupPlacement {
            style_props,
            true_position: position,
            scroll_offset,
            attempts,
        }
    }
}

/// Scroll target along one axis: the midpoint of the span covering popup
/// and target, minus half a viewport, but never past either near edge and
/// never negative.
fn scroll_axis(popup_edge: Px, popup_extent: Px, target_edge: Px, target_far_edge: Px, viewport_extent: Px) -> Px {
    let near = popup_edge.min(target_edge);
    let far = (popup_edge + popup_extent).max(target_far_edge);
    let midpoint = (near + far - viewport_extent) / 2.0;
    popup_edge.min(target_edge).min(midpoint).max(Px::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PopupCorrections;

    const VIEWPORT: DVec2 = DVec2::new(1200.0, 900.0);
    const POPUP: DVec2 = DVec2::new(400.0, 400.0);

    fn target() -> Bounds {
        Bounds::new(300.0, 200.0, 100.0, 50.0)
    }

    fn parser(target: Bounds, position: Position) -> PopupParser {
        PopupParser::new(target, &PopupConfig::default(), &ArrowConfig::default(), POPUP, VIEWPORT)
            .position(position, false)
    }

    fn top_left(placement: &PopupPlacement) -> (f64, f64) {
        (
            placement.style_props.number("top"),
            placement.style_props.number("left"),
        )
    }

    #[test]
    fn bottom_fits_below_the_target() {
        let placed = parser(target(), Position::Bottom).parse();
        assert_eq!(placed.true_position, Position::Bottom);
        assert_eq!(placed.attempts, 1);
        insta::assert_snapshot!(
            placed.style_props.to_css(),
            @"left: 50px; max-height: 450px; max-width: 450px; top: 382px"
        );
        assert_eq!(placed.scroll_offset, ScrollOffset::new(Px(91.0), Px(0.0)));
    }

    #[test]
    fn top_cascades_until_bottom() {
        // TOP, TOP_LEFT, LEFT and BOTTOM_LEFT all spill out of the document.
        let placed = parser(target(), Position::Top).parse();
        assert_eq!(placed.true_position, Position::Bottom);
        assert_eq!(placed.attempts, 5);
        assert_eq!(top_left(&placed), (382.0, 50.0));
    }

    #[test]
    fn right_fits_beside_the_target() {
        let placed = parser(target(), Position::Right).parse();
        assert_eq!(placed.true_position, Position::Right);
        assert_eq!(top_left(&placed), (125.0, 332.0));
    }

    #[test]
    fn top_right_fits_above_a_lower_target() {
        let placed = parser(Bounds::new(600.0, 200.0, 100.0, 50.0), Position::TopRight).parse();
        assert_eq!(placed.true_position, Position::TopRight);
        assert_eq!(top_left(&placed), (168.0, 218.0));
    }

    #[test]
    fn forced_position_is_clamped_and_shrunk() {
        let placed = parser(target(), Position::Top).position(Position::Top, true).parse();
        assert_eq!(placed.true_position, Position::Top);
        assert_eq!(placed.attempts, 1);
        assert_eq!(placed.style_props.get("top"), Some("0px"));
        assert_eq!(placed.style_props.get("left"), Some("50px"));
        assert_eq!(placed.style_props.get("max-height"), Some("318px"));
        assert_eq!(placed.style_props.get("max-width"), Some("450px"));
    }

    #[test]
    fn center_never_cascades() {
        let tiny = PopupConfig {
            style_props: StyleProps::from_values([("min-height", 5000.0), ("min-width", 5000.0)]),
            ..Default::default()
        };
        let placed = PopupParser::new(target(), &tiny, &ArrowConfig::default(), POPUP, VIEWPORT)
            .position(Position::Center, false)
            .parse();
        assert_eq!(placed.true_position, Position::Center);
        assert_eq!(placed.attempts, 1);
        assert_eq!(top_left(&placed), (250.0, 400.0));
    }

    #[test]
    fn center_applies_corrections() {
        let popup = PopupConfig {
            corrections: PopupCorrections {
                correction_top: -20.0,
                correction_left: 5.0,
                correction_margin: 0.0,
            },
            ..Default::default()
        };
        let placed = PopupParser::new(target(), &popup, &ArrowConfig::default(), POPUP, VIEWPORT)
            .position(Position::Center, false)
            .parse();
        assert_eq!(top_left(&placed), (230.0, 405.0));
    }

    #[test]
    fn nothing_fits_forces_bottom_after_every_position() {
        let huge_min = PopupConfig {
            style_props: StyleProps::from_values([
                ("min-height", 500.0),
                ("max-height", 450.0),
                ("min-width", 350.0),
                ("max-width", 450.0),
            ]),
            ..Default::default()
        };
        for start in &Position::ALL[..8] {
            let placed = PopupParser::new(target(), &huge_min, &ArrowConfig::default(), POPUP, VIEWPORT)
                .position(*start, false)
                .parse();
            assert_eq!(placed.true_position, Position::Bottom, "starting at {start}");
            assert_eq!(placed.attempts, Position::ALL.len() + 1, "starting at {start}");
        }
    }

    #[test]
    fn directional_positions_never_go_negative() {
        let corner = Bounds::new(0.0, 0.0, 40.0, 20.0);
        for position in &Position::ALL[..8] {
            for force in [false, true] {
                let placed = parser(corner, *position).position(*position, force).parse();
                let (top, left) = top_left(&placed);
                let raw_top = placed.style_props.get("top").unwrap_or_default();
                let raw_left = placed.style_props.get("left").unwrap_or_default();
                assert!(!raw_top.starts_with('-') && top >= 0.0, "{position} forced={force}: {raw_top}");
                assert!(!raw_left.starts_with('-') && left >= 0.0, "{position} forced={force}: {raw_left}");
            }
        }
    }

    #[test]
    fn short_viewport_pushes_top_away() {
        let short = DVec2::new(1200.0, 100.0);
        let placed = PopupParser::new(target(), &PopupConfig::default(), &ArrowConfig::default(), POPUP, short)
            .position(Position::Top, false)
            .parse();
        assert_ne!(placed.true_position, Position::Top);
        assert!(placed.attempts <= Position::ALL.len() + 1);
    }

    #[test]
    fn scroll_offset_brings_both_into_view() {
        let far_down = Bounds::new(2000.0, 100.0, 100.0, 50.0);
        let placed = parser(far_down, Position::Bottom).parse();
        // top = 2082; span 2000..2482 centred in 900px
        assert_eq!(placed.scroll_offset.top, Px(1791.0));
        assert_eq!(placed.scroll_offset.left, Px(0.0));
    }

    #[test]
    fn scroll_axis_never_passes_the_near_edge() {
        assert_eq!(scroll_axis(Px(100.0), Px(2000.0), Px(300.0), Px(350.0), Px(900.0)), Px(100.0));
        assert_eq!(scroll_axis(Px(10.0), Px(10.0), Px(20.0), Px(30.0), Px(900.0)), Px(0.0));
    }
}
