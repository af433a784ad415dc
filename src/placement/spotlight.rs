//! Spotlight: the highlighted cut-out around the target.

use crate::config::SpotlightConfig;
use crate::style::StyleProps;
use crate::types::{Bounds, Px};

/// Target rectangle inflated by `padding` and nudged by the corrections.
///
/// No fitting happens here: the rectangle may extend past the viewport.
pub fn spotlight_styles(target: &Bounds, config: &SpotlightConfig) -> StyleProps {
    let c = &config.corrections;
    let padding = Px(config.padding);

    let top = target.top() + Px(c.correction_top) - padding;
    let left = target.left() + Px(c.correction_left) - padding;
    let height = target.height() + Px(c.correction_height) + padding * 2.0;
    let width = target.width() + Px(c.correction_width) + padding * 2.0;

    StyleProps::from_values([("top", top), ("left", left), ("height", height), ("width", width)])
}
