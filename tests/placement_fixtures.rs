//! Data-driven popup + arrow placement checks.
//!
//! Each `tests/fixtures/*.json` file describes one target, the rendered popup
//! size, the viewport and the requested position, plus the expected
//! placement. Only the style properties listed under `expect` are compared.

use std::collections::BTreeMap;

use datatest_stable::Utf8Path;
use glam::DVec2;
use guided_tour::config::{ElementsConfig, PartialElementsConfig};
use guided_tour::placement::{PopupParser, arrow_styles};
use guided_tour::{Bounds, Position, StyleProps};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Rect {
    top: f64,
    left: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Deserialize)]
struct Size {
    width: f64,
    height: f64,
}

impl Size {
    fn vec(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }
}

#[derive(Debug, Deserialize)]
struct Scroll {
    top: f64,
    left: f64,
}

#[derive(Debug, Deserialize)]
struct Expect {
    position: Position,
    attempts: Option<usize>,
    #[serde(default)]
    popup: BTreeMap<String, String>,
    scroll: Option<Scroll>,
    #[serde(default)]
    arrow: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    target: Rect,
    popup: Size,
    viewport: Size,
    position: Position,
    #[serde(default)]
    force_position: bool,
    #[serde(default)]
    config: PartialElementsConfig,
    expect: Expect,
}

fn check_styles(what: &str, actual: &StyleProps, expected: &BTreeMap<String, String>) -> Result<(), String> {
    for (property, value) in expected {
        match actual.get(property) {
            Some(v) if v == value => {}
            other => {
                return Err(format!(
                    "{what} `{property}`: expected {value:?}, got {other:?} (all: {actual})"
                ));
            }
        }
    }
    Ok(())
}

fn test_placement_file(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let fixture: Fixture = serde_json::from_str(&source)?;
    let config = ElementsConfig::resolve(None, &fixture.config);

    let t = &fixture.target;
    let target = Bounds::new(t.top, t.left, t.width, t.height);
    let placement = PopupParser::new(
        target,
        &config.popup_config,
        &config.arrow_config,
        fixture.popup.vec(),
        fixture.viewport.vec(),
    )
    .position(fixture.position, fixture.force_position)
    .parse();

    let expect = &fixture.expect;
    if placement.true_position != expect.position {
        return Err(format!(
            "{path}: expected position {}, got {}",
            expect.position, placement.true_position
        )
        .into());
    }
    if let Some(attempts) = expect.attempts {
        if placement.attempts != attempts {
            return Err(format!("{path}: expected {attempts} attempts, got {}", placement.attempts).into());
        }
    }
    if placement.attempts > Position::ALL.len() + 1 {
        return Err(format!("{path}: cascade ran {} times", placement.attempts).into());
    }

    for edge in ["top", "left"] {
        if placement.style_props.number(edge) < 0.0 || placement.style_props.get(edge).is_some_and(|v| v.starts_with('-')) {
            return Err(format!("{path}: popup {edge} is negative: {}", placement.style_props).into());
        }
    }

    check_styles("popup", &placement.style_props, &expect.popup).map_err(|e| format!("{path}: {e}"))?;

    if let Some(scroll) = &expect.scroll {
        let actual = placement.scroll_offset;
        if actual.top.raw() != scroll.top || actual.left.raw() != scroll.left {
            return Err(format!(
                "{path}: expected scroll ({}, {}), got ({}, {})",
                scroll.top, scroll.left, actual.top, actual.left
            )
            .into());
        }
    }

    let arrow = arrow_styles(&target, placement.true_position, &config.popup_config, &config.arrow_config);
    check_styles("arrow", &arrow, &expect.arrow).map_err(|e| format!("{path}: {e}"))?;

    Ok(())
}

datatest_stable::harness! {
    { test = test_placement_file, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"), pattern = r"\.json$" },
}
