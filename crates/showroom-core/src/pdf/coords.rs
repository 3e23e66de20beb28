//! Template coordinate maps.
//!
//! Each template page has a side-car JSON file mapping field keys to page
//! positions: `{"customer_name": [90.0, 712.0], ...}`. A missing side-car
//! loads as an empty map; a side-car that exists but is malformed fails
//! fast with a diagnostic naming the file. Resolving a key never fails -
//! unmapped keys fall back to the document type's default table, then to
//! its fallback position, so a partially-specified map still produces a
//! usable document.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, ShowroomError};

/// A position on the template page, in page units from the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Field-key to position table for one template.
#[derive(Debug, Clone)]
pub struct CoordinateMap {
    positions: HashMap<String, Position>,
    defaults: HashMap<String, Position>,
    fallback: Position,
}

impl CoordinateMap {
    /// An empty map with the given per-key defaults and fallback position.
    pub fn new(defaults: HashMap<String, Position>, fallback: Position) -> Self {
        Self {
            positions: HashMap::new(),
            defaults,
            fallback,
        }
    }

    /// Load a side-car JSON file.
    ///
    /// A missing file yields an empty map (defaults apply to every key).
    ///
    /// # Errors
    ///
    /// Returns `ShowroomError::CoordinateMap` when the file exists but is
    /// not an object of `key -> [x, y]` number pairs.
    pub fn load(
        path: &Path,
        defaults: HashMap<String, Position>,
        fallback: Position,
    ) -> Result<Self> {
        let mut map = Self::new(defaults, fallback);
        if !path.exists() {
            return Ok(map);
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            ShowroomError::CoordinateMap(format!("{}: {}", path.display(), e))
        })?;
        let value: Value = serde_json::from_str(&contents).map_err(|e| {
            ShowroomError::CoordinateMap(format!("{}: {}", path.display(), e))
        })?;
        let object = value.as_object().ok_or_else(|| {
            ShowroomError::CoordinateMap(format!(
                "{}: expected an object of key -> [x, y] pairs",
                path.display()
            ))
        })?;

        for (key, entry) in object {
            let pair = entry.as_array().filter(|a| a.len() == 2).ok_or_else(|| {
                ShowroomError::CoordinateMap(format!(
                    "{}: field {:?} must be a two-element [x, y] array",
                    path.display(),
                    key
                ))
            })?;
            let x = pair[0].as_f64().ok_or_else(|| {
                ShowroomError::CoordinateMap(format!(
                    "{}: field {:?} has a non-numeric x",
                    path.display(),
                    key
                ))
            })?;
            let y = pair[1].as_f64().ok_or_else(|| {
                ShowroomError::CoordinateMap(format!(
                    "{}: field {:?} has a non-numeric y",
                    path.display(),
                    key
                ))
            })?;
            map.positions
                .insert(key.clone(), Position::new(x as f32, y as f32));
        }

        Ok(map)
    }

    /// Resolve a field key to a position. Never fails: unmapped keys use
    /// the default table, then the fallback position.
    pub fn resolve(&self, key: &str) -> Position {
        self.positions
            .get(key)
            .or_else(|| self.defaults.get(key))
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Whether the side-car supplied a position for `key`.
    pub fn is_mapped(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }
}

/// Keys rendered as a drawn checkbox rather than text.
pub fn is_checkbox_key(key: &str) -> bool {
    matches!(key, "gate_pass" | "documents_delivered")
        || (key.starts_with("cert_") && key.ends_with("_box"))
}

/// Tokens treated as ticking a checkbox.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}
