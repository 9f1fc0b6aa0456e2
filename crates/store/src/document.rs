//! Tagged wire documents and their projection into rows.

use std::collections::HashMap;

use serde::Deserialize;
use tally_engine::Row;

/// A raw document record from the remote store.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
}

/// One tagged value from the wire. At most one variant is populated;
/// integers arrive as strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    #[serde(default)]
    pub string_value: Option<String>,
    #[serde(default)]
    pub integer_value: Option<String>,
    #[serde(default)]
    pub double_value: Option<f64>,
    #[serde(default)]
    pub boolean_value: Option<bool>,
    #[serde(default)]
    pub timestamp_value: Option<String>,
}

impl FieldValue {
    /// Text form of whichever variant is present, or "".
    pub fn text(&self) -> String {
        if let Some(s) = &self.string_value {
            return s.clone();
        }
        if let Some(i) = &self.integer_value {
            return i.clone();
        }
        if let Some(d) = self.double_value {
            return d.to_string();
        }
        if let Some(b) = self.boolean_value {
            return b.to_string();
        }
        if let Some(t) = &self.timestamp_value {
            return t.clone();
        }
        String::new()
    }
}

/// Project a document into the fixed row schema, substituting "" for any
/// absent field. All "might be absent" handling lives here.
pub fn project(doc: &Document) -> Row {
    let field = |name: &str| doc.fields.get(name).map(FieldValue::text).unwrap_or_default();
    Row {
        email: field("email"),
        user_id: field("userId"),
        sku: field("sku"),
        status: field("status"),
        discount: field("discount"),
        date: field("date"),
    }
}
