//! Tool Library - JSON-based tool header data
//!
//! Maps a lower-cased TOOL_KEY to the display name and cutting data written
//! into each tool header. Loaded once per run and read-only afterwards.
//!
//! ```json
//! {
//!   "UDRILL50": { "display": "(U-DRILL 50MM)", "type": "G97", "speed": 900, "feed": ".08" }
//! }
//! ```

use crate::error::{PostError, Result};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default tool table file name, looked up in the working directory
pub const DEFAULT_TOOL_TABLE: &str = "tools.json";

/// Header data for one tool
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolEntry {
    /// Text written after the N-number, usually a parenthesized comment
    #[serde(default = "default_display")]
    pub display: String,

    /// Spindle mode written after G99 (G96 constant surface speed, G97 fixed RPM)
    #[serde(rename = "type", default = "default_motion_code")]
    pub motion_code: String,

    /// Written verbatim after `S`
    #[serde(default = "default_speed", deserialize_with = "scalar")]
    pub speed: String,

    /// Written verbatim after `F`
    #[serde(default = "default_feed", deserialize_with = "scalar")]
    pub feed: String,
}

fn default_display() -> String {
    "(UNKNOWN TOOL)".to_string()
}

fn default_motion_code() -> String {
    "G96".to_string()
}

fn default_speed() -> String {
    "200".to_string()
}

fn default_feed() -> String {
    ".25".to_string()
}

/// Speed and feed show up both as JSON strings and numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
    })
}

/// Normalized lookup form of a tool key
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Tool table - entries indexed by normalized key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolTable {
    tools: HashMap<String, ToolEntry>,
}

impl ToolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a tool table from JSON text, normalizing keys
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let raw: HashMap<String, ToolEntry> = serde_json::from_str(json)?;
        Ok(raw.into_iter().collect())
    }

    /// Load a tool table from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PostError::ReadToolTable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| PostError::ParseToolTable {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a tool table, falling back to an empty one when the file doesn't exist.
    ///
    /// A file that exists but can't be read or parsed is still an error.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("No tool table at {} - continuing without tool data", path.display());
            return Ok(Self::new());
        }

        let table = Self::from_file(path)?;
        info!("Loaded {} tools from {}", table.len(), path.display());
        debug!("Tool keys: {}", table.keys().join(", "));
        Ok(table)
    }

    pub fn insert(&mut self, key: &str, entry: ToolEntry) {
        self.tools.insert(normalize_key(key), entry);
    }

    /// Look up a tool by key (case-insensitive, surrounding whitespace ignored)
    pub fn get(&self, key: &str) -> Option<&ToolEntry> {
        self.tools.get(&normalize_key(key))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.tools.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl FromIterator<(String, ToolEntry)> for ToolTable {
    fn from_iter<I: IntoIterator<Item = (String, ToolEntry)>>(iter: I) -> Self {
        let mut table = ToolTable::new();
        for (key, entry) in iter {
            table.insert(&key, entry);
        }
        table
    }
}
