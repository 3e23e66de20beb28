//! Overlay content construction.
//!
//! The overlay carries only the variable text and check marks for one
//! document instance; it is layered over the template page's own content.

use lopdf::content::{Content, Operation};
use lopdf::Object;

use super::coords::{is_checkbox_key, is_truthy, CoordinateMap};
use super::FieldValues;

/// Resource name of the font the overlay registers on the page.
pub(super) const OVERLAY_FONT: &str = "Fov";

const FONT_SIZE: f32 = 10.0;

/// Vertical step between stacked lines of a multi-line value.
const LINE_STEP: f32 = 12.0;

const BOX_SIZE: f32 = 12.0;

/// Field keys holding currency amounts, printed with thousands separators
/// and no decimals when the value parses as a number.
const CURRENCY_KEYS: &[&str] = &[
    "total_amount",
    "advance",
    "balance",
    "sold_price",
    "listed_price",
];

/// Build the overlay content stream for one document instance.
pub(super) fn build_overlay(map: &CoordinateMap, fields: &FieldValues) -> Content {
    let mut ops = vec![
        Operation::new("q", vec![]),
        // black fill and stroke for everything the overlay draws
        Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
        Operation::new("RG", vec![0.into(), 0.into(), 0.into()]),
    ];

    for (key, value) in fields {
        let pos = map.resolve(key);
        if is_checkbox_key(key) {
            push_checkbox(&mut ops, pos.x, pos.y, is_truthy(value));
        } else {
            let text = if CURRENCY_KEYS.contains(&key.as_str()) {
                format_amount(value)
            } else {
                value.clone()
            };
            push_text(&mut ops, pos.x, pos.y, &text);
        }
    }

    ops.push(Operation::new("Q", vec![]));
    Content { operations: ops }
}

/// Left-aligned text; multi-line values stack downward with a fixed step.
fn push_text(ops: &mut Vec<Operation>, x: f32, mut y: f32, text: &str) {
    for line in text.lines() {
        if !line.is_empty() {
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new(
                "Tf",
                vec![OVERLAY_FONT.into(), FONT_SIZE.into()],
            ));
            ops.push(Operation::new("Td", vec![x.into(), y.into()]));
            ops.push(Operation::new("Tj", vec![Object::string_literal(line)]));
            ops.push(Operation::new("ET", vec![]));
        }
        y -= LINE_STEP;
    }
}

/// An outlined square; a truthy value adds a check mark inside it.
fn push_checkbox(ops: &mut Vec<Operation>, x: f32, y: f32, ticked: bool) {
    ops.push(Operation::new("w", vec![1.0f32.into()]));
    ops.push(Operation::new(
        "re",
        vec![x.into(), y.into(), BOX_SIZE.into(), BOX_SIZE.into()],
    ));
    ops.push(Operation::new("S", vec![]));

    if ticked {
        // check mark as two strokes: down to the notch, up to the far corner
        ops.push(Operation::new("w", vec![1.5f32.into()]));
        ops.push(Operation::new(
            "m",
            vec![(x + 2.0).into(), (y + BOX_SIZE * 0.55).into()],
        ));
        ops.push(Operation::new(
            "l",
            vec![(x + BOX_SIZE * 0.4).into(), (y + 2.0).into()],
        ));
        ops.push(Operation::new(
            "l",
            vec![(x + BOX_SIZE - 2.0).into(), (y + BOX_SIZE - 2.0).into()],
        ));
        ops.push(Operation::new("S", vec![]));
    }
}

/// Format a currency-like value with thousands separators and no decimals.
/// Non-numeric input is returned as-is rather than raising.
pub fn format_amount(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => group_thousands(n),
        _ => raw.to_string(),
    }
}

fn group_thousands(n: f64) -> String {
    let negative = n < 0.0;
    let digits = (n.abs().round() as i64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if negative {
        format!("-{}", out)
    } else {
        out
    }
}
