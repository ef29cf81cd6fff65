//! Provider payload → canonical field mapping.
//!
//! Every mapper runs in two phases: a common mapping valid for all document
//! types, then an optional per-type special mapping whose keys win over the
//! common ones. Contributor lists are normalized element by element through
//! [`DataMapper::extract_contributor`]; elements that cannot be normalized are
//! dropped.

pub mod arxiv;
pub mod doi;
pub mod isbn;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::types::{Contributor, DocumentType, FieldId, FieldMapping, FieldValue};

pub use arxiv::ArxivMapper;
pub use doi::DoiMapper;
pub use isbn::IsbnMapper;

static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(1[6-9]|20)\d{2}\b").expect("valid regex"));
static MARKUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid regex"));

pub trait DataMapper: Send + Sync {
    /// Fields that apply to every document type.
    fn common_mapping(&self, raw: &Value) -> FieldMapping;

    /// Per-type fields; `None` when the type has no special handling.
    fn special_mapping(&self, raw: &Value, document_type: DocumentType) -> Option<FieldMapping>;

    /// The provider's raw contributor list, if it has one.
    fn raw_contributors<'a>(&self, raw: &'a Value) -> Option<&'a Vec<Value>>;

    fn extract_contributor(&self, raw: &Value) -> Option<Contributor>;

    fn map(&self, raw: &Value, document_type: DocumentType) -> FieldMapping {
        let mut mapping = self.common_mapping(raw);
        if let Some(special) = self.special_mapping(raw, document_type) {
            mapping.overlay(special);
        }
        if let Some(list) = self.raw_contributors(raw) {
            let contributors: Vec<Contributor> = list
                .iter()
                .filter_map(|item| self.extract_contributor(item))
                .collect();
            mapping.insert(FieldId::Authors, FieldValue::Contributors(contributors));
        }
        mapping
    }
}

// ─── Shared JSON helpers ─────────────────────────────────────────────────────

/// String member, or first string of an array member.
pub(crate) fn first_str<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    match v.get(key)? {
        Value::String(s) => Some(s.as_str()),
        Value::Array(items) => items.iter().find_map(Value::as_str),
        _ => None,
    }
}

/// String or number member rendered as text.
pub(crate) fn scalar_text(v: &Value, key: &str) -> Option<String> {
    match v.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn strip_markup(s: &str) -> String {
    collapse_whitespace(&MARKUP_RE.replace_all(s, " "))
}

pub(crate) fn year_in(s: &str) -> Option<String> {
    YEAR_RE.find(s).map(|m| m.as_str().to_string())
}

/// Non-empty name, trimmed.
pub(crate) fn clean_name(s: &str) -> Option<String> {
    let s = collapse_whitespace(s);
    let s = s.trim_matches(|c: char| c == ',' || c.is_whitespace());
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
