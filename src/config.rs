//! Element configuration and its resolution.
//!
//! Each overlay element (spotlight, popup, arrow) has a fully-populated
//! config type and a `Partial*` twin that users write. Resolution layers
//! built-in default → global → step, and does so separately for the block
//! itself, its `corrections` and its `styleProps`: a step that only sets
//! `spotlightConfig.corrections.correctionTop` keeps every other value.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::style::StyleProps;

/// A resolved config that partial configs can be layered onto.
pub trait Layered: Clone {
    type Partial;

    /// Overwrite every field `partial` sets.
    fn layer(&mut self, partial: &Self::Partial);
}

/// default → global → step, later wins.
pub fn resolve<T: Layered>(default: &T, global: Option<&T::Partial>, step: Option<&T::Partial>) -> T {
    let mut resolved = default.clone();
    for partial in [global, step].into_iter().flatten() {
        resolved.layer(partial);
    }
    resolved
}

fn layer_style(target: &mut StyleProps, partial: &Option<StyleProps>) {
    if let Some(props) = partial {
        target.extend(props);
    }
}

macro_rules! set_if_some {
    ($target:expr, $partial:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = $partial.$field {
                $target.$field = v;
            }
        )+
    };
}

// ============================================================================
// Spotlight
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotlightCorrections {
    pub correction_top: f64,
    pub correction_left: f64,
    pub correction_height: f64,
    pub correction_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSpotlightCorrections {
    pub correction_top: Option<f64>,
    pub correction_left: Option<f64>,
    pub correction_height: Option<f64>,
    pub correction_width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotlightConfig {
    pub corrections: SpotlightCorrections,
    /// Extra space around the highlighted element.
    pub padding: f64,
    pub style_props: StyleProps,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            corrections: SpotlightCorrections::default(),
            padding: defaults::SPOTLIGHT_PADDING,
            style_props: StyleProps::from_values([("transition", defaults::SPOTLIGHT_TRANSITION)]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSpotlightConfig {
    pub corrections: Option<PartialSpotlightCorrections>,
    pub padding: Option<f64>,
    pub style_props: Option<StyleProps>,
}

impl Layered for SpotlightConfig {
    type Partial = PartialSpotlightConfig;

    fn layer(&mut self, partial: &PartialSpotlightConfig) {
        if let Some(c) = partial.corrections {
            set_if_some!(
                self.corrections,
                c,
                correction_top,
                correction_left,
                correction_height,
                correction_width
            );
        }
        set_if_some!(self, partial, padding);
        layer_style(&mut self.style_props, &partial.style_props);
    }
}

// ============================================================================
// Popup
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupCorrections {
    pub correction_top: f64,
    pub correction_left: f64,
    pub correction_margin: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialPopupCorrections {
    pub correction_top: Option<f64>,
    pub correction_left: Option<f64>,
    pub correction_margin: Option<f64>,
}

/// Popup config. `style_props` always carries the four size bounds
/// (`min-height`, `max-height`, `min-width`, `max-width`); they decide what
/// counts as "fits" during placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupConfig {
    pub corrections: PopupCorrections,
    /// Distance between spotlight and popup.
    pub margin: f64,
    pub style_props: StyleProps,
}

impl PopupConfig {
    /// `margin + correctionMargin`
    pub fn effective_margin(&self) -> f64 {
        self.margin + self.corrections.correction_margin
    }

    pub fn min_height(&self) -> f64 {
        self.style_props.number("min-height")
    }

    pub fn max_height(&self) -> f64 {
        self.style_props.number("max-height")
    }

    pub fn min_width(&self) -> f64 {
        self.style_props.number("min-width")
    }

    pub fn max_width(&self) -> f64 {
        self.style_props.number("max-width")
    }
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            corrections: PopupCorrections::default(),
            margin: defaults::POPUP_MARGIN,
            style_props: StyleProps::from_values([
                ("min-height", defaults::POPUP_MIN_HEIGHT),
                ("max-height", defaults::POPUP_MAX_HEIGHT),
                ("min-width", defaults::POPUP_MIN_WIDTH),
                ("max-width", defaults::POPUP_MAX_WIDTH),
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialPopupConfig {
    pub corrections: Option<PartialPopupCorrections>,
    pub margin: Option<f64>,
    pub style_props: Option<StyleProps>,
}

impl Layered for PopupConfig {
    type Partial = PartialPopupConfig;

    fn layer(&mut self, partial: &PartialPopupConfig) {
        if let Some(c) = partial.corrections {
            set_if_some!(self.corrections, c, correction_top, correction_left, correction_margin);
        }
        set_if_some!(self, partial, margin);
        layer_style(&mut self.style_props, &partial.style_props);
    }
}

// ============================================================================
// Arrow
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowConfig {
    /// Drives both the glyph's border widths and the offset math.
    pub arrow_size: f64,
    pub style_props: StyleProps,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            arrow_size: defaults::ARROW_SIZE,
            style_props: StyleProps::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialArrowConfig {
    pub arrow_size: Option<f64>,
    pub style_props: Option<StyleProps>,
}

impl Layered for ArrowConfig {
    type Partial = PartialArrowConfig;

    fn layer(&mut self, partial: &PartialArrowConfig) {
        set_if_some!(self, partial, arrow_size);
        layer_style(&mut self.style_props, &partial.style_props);
    }
}

// ============================================================================
// All three together
// ============================================================================

/// The three partial blocks as they appear on a step or in global options.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialElementsConfig {
    pub spotlight_config: Option<PartialSpotlightConfig>,
    pub popup_config: Option<PartialPopupConfig>,
    pub arrow_config: Option<PartialArrowConfig>,
}

/// Fully resolved configs for one step.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementsConfig {
    pub spotlight_config: SpotlightConfig,
    pub popup_config: PopupConfig,
    pub arrow_config: ArrowConfig,
}

impl ElementsConfig {
    pub fn resolve(global: Option<&PartialElementsConfig>, step: &PartialElementsConfig) -> Self {
        let builtin = ElementsConfig::default();
        Self {
            spotlight_config: resolve(
                &builtin.spotlight_config,
                global.and_then(|g| g.spotlight_config.as_ref()),
                step.spotlight_config.as_ref(),
            ),
            popup_config: resolve(
                &builtin.popup_config,
                global.and_then(|g| g.popup_config.as_ref()),
                step.popup_config.as_ref(),
            ),
            arrow_config: resolve(
                &builtin.arrow_config,
                global.and_then(|g| g.arrow_config.as_ref()),
                step.arrow_config.as_ref(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(json: &str) -> PartialElementsConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let resolved = ElementsConfig::resolve(None, &PartialElementsConfig::default());
        assert_eq!(resolved, ElementsConfig::default());
        assert_eq!(resolved.popup_config.margin, 32.0);
        assert_eq!(resolved.popup_config.min_height(), 350.0);
        assert_eq!(resolved.popup_config.max_width(), 450.0);
        assert_eq!(resolved.arrow_config.arrow_size, 16.0);
        assert_eq!(
            resolved.spotlight_config.style_props.get("transition"),
            Some(defaults::SPOTLIGHT_TRANSITION)
        );
    }

    #[test]
    fn single_correction_keeps_everything_else() {
        let step = partial(r#"{ "spotlightConfig": { "corrections": { "correctionTop": 5 } } }"#);
        let resolved = ElementsConfig::resolve(None, &step);

        let mut expected = ElementsConfig::default();
        expected.spotlight_config.corrections.correction_top = 5.0;
        assert_eq!(resolved, expected);
    }

    #[test]
    fn step_overrides_global_overrides_default() {
        let global = partial(
            r#"{
                "popupConfig": {
                    "margin": 10,
                    "corrections": { "correctionTop": 1, "correctionLeft": 2 },
                    "styleProps": { "minHeight": "100px", "background": "black" }
                }
            }"#,
        );
        let step = partial(
            r#"{
                "popupConfig": {
                    "corrections": { "correctionLeft": 20 },
                    "styleProps": { "background": "white" }
                }
            }"#,
        );
        let popup = ElementsConfig::resolve(Some(&global), &step).popup_config;

        assert_eq!(popup.margin, 10.0);
        assert_eq!(popup.corrections.correction_top, 1.0);
        assert_eq!(popup.corrections.correction_left, 20.0);
        assert_eq!(popup.corrections.correction_margin, 0.0);
        assert_eq!(popup.style_props.get("min-height"), Some("100px"));
        assert_eq!(popup.style_props.get("max-height"), Some("450px"));
        assert_eq!(popup.style_props.get("background"), Some("white"));
    }

    #[test]
    fn style_props_merge_instead_of_replacing() {
        let step = partial(r#"{ "spotlightConfig": { "styleProps": "border-radius: 4px" } }"#);
        let spotlight = ElementsConfig::resolve(None, &step).spotlight_config;
        assert_eq!(spotlight.style_props.get("border-radius"), Some("4px"));
        assert_eq!(
            spotlight.style_props.get("transition"),
            Some(defaults::SPOTLIGHT_TRANSITION)
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let global = partial(r#"{ "arrowConfig": { "arrowSize": 8 } }"#);
        let step = partial(r#"{ "popupConfig": { "margin": 4 } }"#);
        let a = ElementsConfig::resolve(Some(&global), &step);
        let b = ElementsConfig::resolve(Some(&global), &step);
        assert_eq!(a, b);

        // Layering the same partial twice changes nothing either.
        let mut twice = a.popup_config.clone();
        twice.layer(step.popup_config.as_ref().unwrap());
        assert_eq!(twice, a.popup_config);
    }

    #[test]
    fn effective_margin_adds_correction() {
        let step = partial(r#"{ "popupConfig": { "corrections": { "correctionMargin": -8 } } }"#);
        let popup = ElementsConfig::resolve(None, &step).popup_config;
        assert_eq!(popup.effective_margin(), 24.0);
    }
}
