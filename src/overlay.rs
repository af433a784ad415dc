//! The presentation layer: spotlight, popup and arrow.
//!
//! Every element updates the same way for each step: clear its inline
//! styles, apply its configured `styleProps`, then lay itself out around the
//! target. The popup is laid out before the arrow, and its true position
//! (after fallback) reaches the arrow through the shared [`Frame`].

use enum_dispatch::enum_dispatch;
use glam::DVec2;

use crate::config::ElementsConfig;
use crate::defaults;
use crate::geometry;
use crate::host::{Effect, Host, OverlayPart, Surface};
use crate::placement::{PopupParser, arrow_styles, spotlight_styles};
use crate::step::{Step, StepComponent};
use crate::style::{StyleProps, StyleValue};
use crate::types::{Bounds, Position, ScrollOffset};

/// One step, as seen by the overlay elements.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub config: &'a ElementsConfig,
    pub component: &'a StepComponent,
    /// Requested position; the popup replaces it with the true position.
    pub position: Position,
    pub force_position: bool,
    pub scroll: bool,
    /// Target in document coordinates; `None` when the step is not anchored.
    pub target: Option<Bounds>,
    /// Target or one of its ancestors is `fixed` / `sticky`.
    pub target_fixed: bool,
    /// Scroll requested by the popup, performed once every element is laid out.
    pub scroll_request: Option<ScrollOffset>,
}

impl<'a> Frame<'a> {
    pub fn new<H: Host + ?Sized>(host: &H, step: &'a Step<H::Element>) -> Self {
        let element = step.element.as_ref().filter(|_| step.is_anchored());
        Self {
            config: &step.config,
            component: &step.step_component,
            position: step.position,
            force_position: step.force_position,
            scroll: step.scroll,
            target: element.map(|e| geometry::element_bounds(host, e)),
            target_fixed: element.is_some_and(|e| geometry::is_fixed_element(host, e)),
            scroll_request: None,
        }
    }
}

#[enum_dispatch]
pub trait OverlayElement {
    fn part(&self) -> OverlayPart;

    /// Styles of the element when the step has no target.
    fn hidden_style(&self, frame: &Frame<'_>, surface: &mut dyn Surface) -> StyleProps;

    /// The configured `styleProps` of this element.
    fn style_props<'f>(&self, frame: &Frame<'f>) -> &'f StyleProps;

    fn reset_style(&self, surface: &mut dyn Surface) {
        surface.dispatch(Effect::ClearStyles(self.part()));
    }

    /// Base styles before positioning: the configured `styleProps`, with the
    /// hidden default on top when the step has no target.
    fn resolve_config(&self, frame: &Frame<'_>, surface: &mut dyn Surface) -> StyleProps {
        let props = self.style_props(frame);
        match frame.target {
            Some(_) => props.clone(),
            None => props.overlaid(&self.hidden_style(frame, surface)),
        }
    }

    /// Final styles for an anchored step, `None` when there is no target.
    fn resolve_position(&self, frame: &mut Frame<'_>, surface: &mut dyn Surface) -> Option<StyleProps>;

    fn update(&self, frame: &mut Frame<'_>, surface: &mut dyn Surface) {
        self.reset_style(surface);
        let base = self.resolve_config(frame, surface);
        let styles = self.resolve_position(frame, surface).unwrap_or(base);
        surface.dispatch(Effect::ApplyStyles(self.part(), styles));
    }
}

/// The highlighted cut-out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spotlight;

impl OverlayElement for Spotlight {
    fn part(&self) -> OverlayPart {
        OverlayPart::Spotlight
    }

    /// Off-screen, without animating the jump.
    fn hidden_style(&self, _frame: &Frame<'_>, _surface: &mut dyn Surface) -> StyleProps {
        StyleProps::from_values([
            ("top", StyleValue::from(defaults::HIDDEN_OFFSET)),
            ("left", StyleValue::from(defaults::HIDDEN_OFFSET)),
            ("transition", StyleValue::from("none")),
        ])
    }

    fn style_props<'f>(&self, frame: &Frame<'f>) -> &'f StyleProps {
        &frame.config.spotlight_config.style_props
    }

    fn resolve_position(&self, frame: &mut Frame<'_>, _surface: &mut dyn Surface) -> Option<StyleProps> {
        let target = frame.target?;
        let config = &frame.config.spotlight_config;
        Some(spotlight_styles(&target, config).overlaid(&config.style_props))
    }
}

/// The dialog box holding the step component.
#[derive(Debug, Clone, Copy, Default)]
pub struct Popup;

impl Popup {
    fn measured_size(surface: &dyn Surface) -> DVec2 {
        surface.popup_size().ceil()
    }
}

impl OverlayElement for Popup {
    fn part(&self) -> OverlayPart {
        OverlayPart::Popup
    }

    /// Centred in the viewport.
    fn hidden_style(&self, _frame: &Frame<'_>, surface: &mut dyn Surface) -> StyleProps {
        let center = geometry::centered(surface.viewport_size(), Self::measured_size(surface));
        StyleProps::from_values([("top", center.y), ("left", center.x)])
    }

    fn style_props<'f>(&self, frame: &Frame<'f>) -> &'f StyleProps {
        &frame.config.popup_config.style_props
    }

    /// The popup's size depends on its content and configured styles, so
    /// both are in place before anything is measured.
    fn resolve_config(&self, frame: &Frame<'_>, surface: &mut dyn Surface) -> StyleProps {
        let props = self.style_props(frame);
        surface.dispatch(Effect::ApplyStyles(OverlayPart::Popup, props.clone()));
        surface.dispatch(Effect::RenderContent(frame.component.clone()));
        match frame.target {
            Some(_) => props.clone(),
            None => props.overlaid(&self.hidden_style(frame, surface)),
        }
    }

    fn resolve_position(&self, frame: &mut Frame<'_>, surface: &mut dyn Surface) -> Option<StyleProps> {
        let Some(target) = frame.target else {
            frame.scroll_request = Some(ScrollOffset::ORIGIN);
            frame.position = Position::Center;
            return None;
        };

        let config = &frame.config.popup_config;
        let placement = PopupParser::new(
            target,
            config,
            &frame.config.arrow_config,
            Self::measured_size(surface),
            surface.viewport_size(),
        )
        .position(frame.position, frame.force_position)
        .parse();

        crate::log::debug!(
            requested = %frame.position,
            placed = %placement.true_position,
            attempts = placement.attempts,
            "popup placed"
        );

        // max-height / max-width are parser inputs and come back adjusted.
        let mut styles = placement.style_props.overlaid(&config.style_props);
        for bound in ["max-height", "max-width"] {
            if let Some(value) = placement.style_props.get(bound) {
                styles.insert(bound, value);
            }
        }

        if frame.scroll && !frame.target_fixed {
            frame.scroll_request = Some(placement.scroll_offset);
        }
        frame.position = placement.true_position;
        Some(styles)
    }
}

/// The triangle pointing from popup to target.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arrow;

impl OverlayElement for Arrow {
    fn part(&self) -> OverlayPart {
        OverlayPart::Arrow
    }

    fn hidden_style(&self, _frame: &Frame<'_>, _surface: &mut dyn Surface) -> StyleProps {
        StyleProps::from_values([("border", 0.0)])
    }

    fn style_props<'f>(&self, frame: &Frame<'f>) -> &'f StyleProps {
        &frame.config.arrow_config.style_props
    }

    fn resolve_position(&self, frame: &mut Frame<'_>, _surface: &mut dyn Surface) -> Option<StyleProps> {
        let target = frame.target?;
        let config = frame.config;
        let styles = arrow_styles(&target, frame.position, &config.popup_config, &config.arrow_config);
        Some(styles.overlaid(&config.arrow_config.style_props))
    }
}

#[enum_dispatch(OverlayElement)]
#[derive(Debug, Clone, Copy)]
pub enum OverlayKind {
    Spotlight,
    Popup,
    Arrow,
}

/// All three elements, updated in dependency order.
#[derive(Debug, Clone)]
pub struct Overlay {
    elements: [OverlayKind; 3],
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            elements: [Spotlight.into(), Popup.into(), Arrow.into()],
        }
    }
}

impl Overlay {
    /// Lay out every element for `step`. Returns the popup's true position.
    pub fn present<H: Host>(&self, host: &mut H, step: &Step<H::Element>) -> Position {
        let mut frame = Frame::new(&*host, step);
        for element in &self.elements {
            element.update(&mut frame, host);
        }
        if let Some(offset) = frame.scroll_request {
            host.dispatch(Effect::ScrollTo(offset));
        }
        frame.position
    }
}
