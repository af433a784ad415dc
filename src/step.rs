//! Tour steps: what users write, and what the engine works with.
//!
//! [`StepDefinition`] / [`GlobalConfig`] / [`TourDefinition`] mirror the
//! host-facing JSON schema (camelCase, every config block partial).
//! [`Step`] is a definition resolved against the page: its target element
//! looked up and its three config blocks fully merged.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ElementsConfig, PartialElementsConfig};
use crate::errors::{ConfigError, SourceContext};
use crate::geometry;
use crate::host::Document;
use crate::types::Position;

/// Identity of a step: its index in the list passed to `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(usize);

impl StepId {
    /// Id of the configured skip step.
    pub const SKIP: StepId = StepId(usize::MAX);

    pub fn new(index: usize) -> Self {
        StepId(index)
    }

    pub fn is_skip(self) -> bool {
        self == StepId::SKIP
    }

    /// Index in the user's step list, `None` for the skip step.
    pub fn index(self) -> Option<usize> {
        (!self.is_skip()).then_some(self.0)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            Some(i) => write!(f, "#{i}"),
            None => write!(f, "skip"),
        }
    }
}

/// Content rendered inside the popup: an opaque component identifier the
/// host knows how to instantiate, plus its inputs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StepComponent {
    pub component: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub inputs: serde_json::Map<String, serde_json::Value>,
}

impl StepComponent {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            inputs: serde_json::Map::new(),
        }
    }
}

fn default_scroll() -> bool {
    true
}

/// One step as written by the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    /// CSS selector of the element to highlight; the first match wins.
    #[serde(default)]
    pub selector: Option<String>,
    pub step_component: StepComponent,
    /// Scroll target and popup into view when the step starts.
    #[serde(default = "default_scroll")]
    pub scroll: bool,
    /// Requested popup position. Ignored without a selector.
    #[serde(default)]
    pub position: Position,
    /// Keep `position` even when the popup does not fit there.
    #[serde(default)]
    pub force_position: bool,
    #[serde(flatten)]
    pub config: PartialElementsConfig,
}

impl StepDefinition {
    pub fn new(step_component: StepComponent) -> Self {
        Self {
            selector: None,
            step_component,
            scroll: true,
            position: Position::Center,
            force_position: false,
            config: PartialElementsConfig::default(),
        }
    }

    #[must_use]
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn force_position(mut self, force: bool) -> Self {
        self.force_position = force;
        self
    }

    #[must_use]
    pub fn scroll(mut self, scroll: bool) -> Self {
        self.scroll = scroll;
        self
    }

    #[must_use]
    pub fn config(mut self, config: PartialElementsConfig) -> Self {
        self.config = config;
        self
    }
}

/// Options shared by every step of a tour.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalConfig {
    #[serde(flatten)]
    pub config: PartialElementsConfig,
    /// Step shown by `skip()`. Without one, skipping jumps to the last step.
    pub skip: Option<Box<StepDefinition>>,
}

/// A whole tour, as loaded from JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourDefinition {
    pub steps: Vec<StepDefinition>,
    #[serde(default)]
    pub options: Option<GlobalConfig>,
}

impl TourDefinition {
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Self::from_json_named("<tour>", source)
    }

    /// Like [`TourDefinition::from_json`], with `name` used in diagnostics.
    pub fn from_json_named(name: &str, source: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(source).map_err(|e| ConfigError::from_json(&SourceContext::new(name, source), &e))
    }
}

/// A step resolved against the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<E> {
    pub id: StepId,
    pub selector: Option<String>,
    /// Present only when the selector matched a visible element.
    pub element: Option<E>,
    pub position: Position,
    pub force_position: bool,
    pub scroll: bool,
    pub step_component: StepComponent,
    pub config: ElementsConfig,
}

impl<E> Step<E> {
    /// Merge `definition` with the global options.
    ///
    /// A step without a selector is always centred.
    pub fn resolve(id: StepId, definition: &StepDefinition, options: Option<&GlobalConfig>, element: Option<E>) -> Self {
        let position = if definition.selector.is_some() {
            definition.position
        } else {
            Position::Center
        };
        Self {
            id,
            selector: definition.selector.clone(),
            element,
            position,
            force_position: definition.force_position,
            scroll: definition.scroll,
            step_component: definition.step_component.clone(),
            config: ElementsConfig::resolve(options.map(|o| &o.config), &definition.config),
        }
    }

    /// Whether placement parsers can run: there is a selector and it
    /// resolved to an element.
    pub fn is_anchored(&self) -> bool {
        self.selector.is_some() && self.element.is_some()
    }
}

/// Resolve every definition against `doc`, dropping steps whose selector
/// matches nothing or only an invisible element. Ids are list indices.
pub fn resolve_steps<D: Document + ?Sized>(
    doc: &D,
    definitions: &[StepDefinition],
    options: Option<&GlobalConfig>,
) -> Vec<Step<D::Element>> {
    let mut steps = Vec::with_capacity(definitions.len());
    for (index, definition) in definitions.iter().enumerate() {
        let id = StepId::new(index);
        let element = match &definition.selector {
            None => None,
            Some(selector) => match doc.query_selector(selector) {
                Some(element) if !geometry::is_not_visible(doc, &element) => Some(element),
                Some(_) => {
                    crate::log::debug!(%id, selector = selector.as_str(), "target is not visible, dropping step");
                    continue;
                }
                None => {
                    crate::log::debug!(%id, selector = selector.as_str(), "no element matches, dropping step");
                    continue;
                }
            },
        };
        steps.push(Step::resolve(id, definition, options, element));
    }
    steps
}

/// The configured skip step, if any. It never has a target element.
pub fn resolve_skip_step<E>(options: Option<&GlobalConfig>) -> Option<Step<E>> {
    let options = options?;
    let definition = options.skip.as_deref()?;
    Some(Step::resolve(StepId::SKIP, definition, Some(options), None))
}
