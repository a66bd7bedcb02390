/// Structured YAML document with per-field leading comments
///
/// serde_yaml drops comments, so the few comments teamsync writes are
/// attached to top-level fields here and emitted while rendering each field.
use crate::error::Result;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// A top-level entry of the document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentField {
    pub value: Value,
    pub leading_comment: Option<String>,
}

/// A mapping document rendered with sorted keys at every level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YamlDocument {
    fields: BTreeMap<String, DocumentField>,
}

impl YamlDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, keeping any comment already attached to it
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.fields.get_mut(&key) {
            Some(field) => field.value = value,
            None => {
                self.fields.insert(
                    key,
                    DocumentField {
                        value,
                        leading_comment: None,
                    },
                );
            }
        }
    }

    /// Attach a comment emitted on the line(s) directly above `key`
    ///
    /// Returns false when the field does not exist.
    pub fn set_leading_comment(&mut self, key: &str, comment: impl Into<String>) -> bool {
        match self.fields.get_mut(key) {
            Some(field) => {
                field.leading_comment = Some(comment.into());
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&DocumentField> {
        self.fields.get(key)
    }

    /// Serialize the document in block style with sorted keys
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        for (key, field) in &self.fields {
            if let Some(comment) = &field.leading_comment {
                for line in comment.lines() {
                    if line.starts_with('#') {
                        out.push_str(line);
                    } else {
                        out.push_str("# ");
                        out.push_str(line);
                    }
                    out.push('\n');
                }
            }
            let mut single = Mapping::new();
            single.insert(Value::String(key.clone()), sort_keys(field.value.clone()));
            out.push_str(&quote_yaml11_booleans(&serde_yaml::to_string(&single)?));
        }
        Ok(out)
    }
}

/// Plain words YAML 1.1 readers resolve to booleans but YAML 1.2 leaves as strings
const YAML11_BOOLEANS: [&str; 12] = [
    "yes", "Yes", "YES", "no", "No", "NO", "on", "On", "ON", "off", "Off", "OFF",
];

/// Single-quote plain string scalars such as `yes` or `off`
///
/// serde_yaml follows YAML 1.2 and leaves them bare, which YAML 1.1 tools
/// read back as booleans. Block scalar content is left untouched.
fn quote_yaml11_booleans(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut block_indent: Option<usize> = None;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches('\n');
        let body = content.trim_start();
        let indent = content.len() - body.len();

        if let Some(parent) = block_indent {
            if body.is_empty() || indent > parent {
                out.push_str(line);
                continue;
            }
            block_indent = None;
        }
        let tail = body.rsplit(' ').next().unwrap_or_default();
        if tail.starts_with(['|', '>']) {
            block_indent = Some(indent);
        }

        let (item, rest) = match body.strip_prefix("- ") {
            Some(rest) => ("- ", rest),
            None => ("", body),
        };
        out.push_str(&content[..indent]);
        out.push_str(item);
        match rest.split_once(": ") {
            Some((key, value)) => {
                out.push_str(&quoted(key));
                out.push_str(": ");
                out.push_str(&quoted(value));
            }
            None => match rest.strip_suffix(':') {
                Some(key) => {
                    out.push_str(&quoted(key));
                    out.push(':');
                }
                None => out.push_str(&quoted(rest)),
            },
        }
        if line.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

fn quoted(scalar: &str) -> std::borrow::Cow<'_, str> {
    if YAML11_BOOLEANS.contains(&scalar) {
        format!("'{scalar}'").into()
    } else {
        scalar.into()
    }
}

/// Recursively order mapping keys so output does not depend on input order
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Mapping(mapping) => {
            let mut entries: Vec<(Value, Value)> = mapping
                .into_iter()
                .map(|(k, v)| (k, sort_keys(v)))
                .collect();
            entries.sort_by_key(|(k, _)| key_order(k));
            Value::Mapping(entries.into_iter().collect())
        }
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn key_order(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other).unwrap_or_default(),
    }
}
