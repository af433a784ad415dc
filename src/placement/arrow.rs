//! Arrow: a CSS border triangle between popup and target.
//!
//! The glyph is drawn with `border-width: 0 s s s` (pointing down) and
//! rotated toward the target. It follows the popup's *true* position, so it
//! must be laid out after the popup cascade has settled.

use crate::config::{ArrowConfig, PopupConfig};
use crate::style::StyleProps;
use crate::types::{Bounds, Position, Px};

/// Styles for the arrow next to `target` when the popup sits at `position`.
///
/// `Center` (and any position without a side) hides the glyph with
/// `border: 0`.
pub fn arrow_styles(target: &Bounds, position: Position, popup: &PopupConfig, arrow: &ArrowConfig) -> StyleProps {
    let size = Px(arrow.arrow_size);
    let margin = Px(popup.effective_margin());
    let correction_top = Px(popup.corrections.correction_top);
    let correction_left = Px(popup.corrections.correction_left);

    let mut styles = StyleProps::new();
    styles.insert("border-width", format!("0 {size}px {size}px {size}px"));

    let horizontal_mid = (target.left() + target.right()) / 2.0 - size;
    let vertical_mid = (target.top() + target.bottom() - size) / 2.0;

    match position {
        Position::Top | Position::TopLeft | Position::TopRight => {
            styles.set("top", (target.top() - margin + correction_top).floor());
            styles.set("left", horizontal_mid);
            styles.set("transform", "rotate(180deg)");
        }
        Position::Bottom | Position::BottomLeft | Position::BottomRight => {
            styles.set("top", (target.bottom() - size + margin + correction_top).ceil());
            styles.set("left", horizontal_mid);
        }
        Position::Right => {
            styles.set("top", vertical_mid);
            styles.set("left", (target.right() + margin + correction_left - size * 1.5).ceil());
            styles.set("transform", "rotate(-90deg)");
        }
        Position::Left => {
            styles.set("top", vertical_mid);
            styles.set("left", (target.left() - margin + correction_left - size / 2.0).floor());
            styles.set("transform", "rotate(90deg)");
        }
        Position::Center => {
            styles.set("border", 0.0);
        }
    }
    styles
}
