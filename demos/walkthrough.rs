//! Walk a tour through a canned page and print every effect.
//!
//! ```sh
//! cargo run --example walkthrough --features tracing
//! cargo run --example walkthrough -- my-tour.json
//! ```

use glam::DVec2;
use guided_tour::{Bounds, Document, Effect, GuidedTour, StepEvent, Surface, TourDefinition};

const DEFAULT_TOUR: &str = r##"{
    "steps": [
        { "stepComponent": { "component": "welcome" } },
        { "selector": "#toolbar", "position": "BOTTOM", "stepComponent": { "component": "toolbar" } },
        { "selector": "#sidebar", "position": "RIGHT", "stepComponent": { "component": "sidebar" } },
        { "selector": "#save", "position": "TOP", "stepComponent": { "component": "save" } },
        { "selector": "#nowhere", "stepComponent": { "component": "never shown" } }
    ],
    "options": {
        "spotlightConfig": { "padding": 4 },
        "popupConfig": { "styleProps": "background: white; border-radius: 6px" }
    }
}"##;

/// A fixed 1280×800 page that prints what it is asked to do.
struct ConsolePage {
    elements: Vec<(&'static str, Bounds)>,
}

impl ConsolePage {
    fn new() -> Self {
        Self {
            elements: vec![
                ("#toolbar", Bounds::new(0.0, 0.0, 1280.0, 48.0)),
                ("#sidebar", Bounds::new(48.0, 0.0, 240.0, 752.0)),
                ("#save", Bounds::new(740.0, 1160.0, 96.0, 36.0)),
            ],
        }
    }
}

impl Document for ConsolePage {
    type Element = usize;

    fn query_selector(&self, selector: &str) -> Option<usize> {
        self.elements.iter().position(|(s, _)| *s == selector)
    }

    fn bounding_client_rect(&self, element: &usize) -> Option<Bounds> {
        self.elements.get(*element).map(|(_, b)| *b)
    }

    fn scroll_position(&self) -> DVec2 {
        DVec2::ZERO
    }

    fn computed_position(&self, _element: &usize) -> Option<String> {
        Some("static".to_string())
    }

    fn parent_element(&self, _element: &usize) -> Option<usize> {
        None
    }

    fn check_visibility(&self, _element: &usize) -> bool {
        true
    }
}

impl Surface for ConsolePage {
    fn dispatch(&mut self, effect: Effect) {
        match effect {
            Effect::Mount => println!("mount"),
            Effect::Unmount => println!("unmount"),
            Effect::ClearStyles(part) => println!("  {part}: clear"),
            Effect::ApplyStyles(part, styles) => println!("  {part}: {styles}"),
            Effect::ScrollTo(offset) => println!("  scroll to {}, {}", offset.top, offset.left),
            Effect::RenderContent(content) => println!("  popup: render <{}>", content.component),
        }
    }

    fn viewport_size(&self) -> DVec2 {
        DVec2::new(1280.0, 800.0)
    }

    fn popup_size(&self) -> DVec2 {
        DVec2::new(360.0, 220.0)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let (name, source) = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(source) => (path, source),
            Err(e) => {
                eprintln!("Error: {path}: {e}");
                std::process::exit(1);
            }
        },
        None => ("<default tour>".to_string(), DEFAULT_TOUR.to_string()),
    };

    let definition = match TourDefinition::from_json_named(&name, &source) {
        Ok(definition) => definition,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(1);
        }
    };

    let mut tour = GuidedTour::new(ConsolePage::new());
    let steps = tour.subscribe();
    println!("{:?}", tour.run_definition(definition));

    while tour.is_running() {
        for event in steps.drain() {
            if let StepEvent::Step { step, position } = event {
                println!("step {} shown at {position}", step.id);
            }
        }
        tour.next();
    }
    println!("{:?}", steps.drain().last());
}
