//! Snapshot loading and item selection.

use std::path::Path;

use serde_json::Value;

use crate::Result;

/// One news entry. Every field is optional; the digest renderer supplies
/// placeholders for whatever is missing.
#[derive(Clone, Debug, Default)]
pub struct Item {
    pub title_bilingual: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub site_name: Option<String>,
    pub source: Option<String>,
    pub published_at: Option<String>,
}

impl Item {
    /// Build from a JSON value, or `None` for non-object entries.
    /// Non-string field values are treated as absent.
    fn from_value(v: &Value) -> Option<Self> {
        let obj = v.as_object()?;
        let field = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            title_bilingual: field("title_bilingual"),
            title: field("title"),
            url: field("url"),
            site_name: field("site_name"),
            source: field("source"),
            published_at: field("published_at"),
        })
    }
}

/// The top-level snapshot document produced by the aggregation pipeline.
///
/// Kept as raw JSON: the document carries more fields than the digest needs
/// and its shape is only loosely guaranteed, so selection is done lazily and
/// leniently instead of through a strict deserialize.
#[derive(Clone, Debug)]
pub struct Snapshot {
    root: Value,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self {
            root: serde_json::from_str(&text)?,
        })
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn generated_at(&self) -> Option<&str> {
        self.root.get("generated_at").and_then(Value::as_str)
    }

    /// Select the item list for the digest.
    ///
    /// `items_ai` (the AI-filtered list) wins whenever it is a sequence,
    /// even an empty one; otherwise `items` is the fallback. Non-object
    /// entries are discarded silently.
    pub fn ai_items(&self) -> Vec<Item> {
        let raw = match self.root.get("items_ai") {
            Some(Value::Array(xs)) => Some(xs),
            _ => match self.root.get("items") {
                Some(Value::Array(xs)) => Some(xs),
                _ => None,
            },
        };

        raw.map(|xs| xs.iter().filter_map(Item::from_value).collect())
            .unwrap_or_default()
    }
}
