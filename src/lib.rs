//! Guided tours over a live page.
//!
//! A tour walks through a list of steps. For each step a **spotlight**
//! highlights the target element, a **popup** shows the step's content next
//! to it and an **arrow** points from one to the other. When the requested
//! popup position does not fit, placement falls back through the other
//! positions until one does.
//!
//! The crate does not touch a DOM itself. A host implements
//! [`Document`](host::Document) (geometry and visibility queries) and
//! [`Surface`](host::Surface) (applying [`Effect`](host::Effect)s), and hands
//! itself to a [`GuidedTour`].
//!
//! ```no_run
//! # use guided_tour::{GuidedTour, TourDefinition, host::Host};
//! # fn demo<H: Host>(host: H) -> Result<(), guided_tour::ConfigError> {
//! let tour = TourDefinition::from_json(r##"{
//!     "steps": [
//!         { "stepComponent": { "component": "welcome" } },
//!         { "selector": "#save", "position": "BOTTOM", "stepComponent": { "component": "save" } }
//!     ]
//! }"##)?;
//!
//! let mut guided = GuidedTour::new(host);
//! let steps = guided.subscribe();
//! guided.run_definition(tour);
//! guided.next();
//! # let _ = steps;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod debounce;
pub mod defaults;
pub mod errors;
pub mod geometry;
pub mod host;
pub mod log;
pub mod overlay;
pub mod placement;
pub mod step;
pub mod style;
pub mod tour;
pub mod types;

pub use config::{ArrowConfig, ElementsConfig, PartialElementsConfig, PopupConfig, SpotlightConfig};
pub use debounce::ViewportEvent;
pub use errors::{ConfigError, UnknownAction};
pub use host::{Document, Effect, Host, OverlayPart, Surface};
pub use step::{GlobalConfig, Step, StepComponent, StepDefinition, StepId, TourDefinition};
pub use style::StyleProps;
pub use tour::{GuidedTour, RunOutcome, StepEvent, StepStream, TourAction};
pub use types::{Bounds, Position, Px, ScrollOffset};
