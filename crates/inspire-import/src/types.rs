use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ImportError;

// ─── Document type ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    Article,
    Thesis,
    Book,
    Chapter,
    Proceedings,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        Self::Article,
        Self::Thesis,
        Self::Book,
        Self::Chapter,
        Self::Proceedings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Thesis => "thesis",
            Self::Book => "book",
            Self::Chapter => "chapter",
            Self::Proceedings => "proceedings",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ImportError::UnknownDocumentType(s.to_string()))
    }
}

// ─── Field vocabulary ────────────────────────────────────────────────────────

/// Canonical field ids. Declaration order is the order fields are shown in a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Title,
    Authors,
    Abstract,
    JournalTitle,
    BookTitle,
    ConferenceTitle,
    Volume,
    Issue,
    PageRange,
    Year,
    PublicationDate,
    Publisher,
    Institution,
    DegreeType,
    NumPages,
    Doi,
    ArxivId,
    Isbn,
    Categories,
    License,
    Note,
}

impl FieldId {
    pub const ALL: [FieldId; 21] = [
        Self::Title,
        Self::Authors,
        Self::Abstract,
        Self::JournalTitle,
        Self::BookTitle,
        Self::ConferenceTitle,
        Self::Volume,
        Self::Issue,
        Self::PageRange,
        Self::Year,
        Self::PublicationDate,
        Self::Publisher,
        Self::Institution,
        Self::DegreeType,
        Self::NumPages,
        Self::Doi,
        Self::ArxivId,
        Self::Isbn,
        Self::Categories,
        Self::License,
        Self::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Authors => "authors",
            Self::Abstract => "abstract",
            Self::JournalTitle => "journal_title",
            Self::BookTitle => "book_title",
            Self::ConferenceTitle => "conference_title",
            Self::Volume => "volume",
            Self::Issue => "issue",
            Self::PageRange => "page_range",
            Self::Year => "year",
            Self::PublicationDate => "publication_date",
            Self::Publisher => "publisher",
            Self::Institution => "institution",
            Self::DegreeType => "degree_type",
            Self::NumPages => "num_pages",
            Self::Doi => "doi",
            Self::ArxivId => "arxiv_id",
            Self::Isbn => "isbn",
            Self::Categories => "categories",
            Self::License => "license",
            Self::Note => "note",
        }
    }

    /// Human label used in the preview table.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Authors => "Authors",
            Self::Abstract => "Abstract",
            Self::JournalTitle => "Journal",
            Self::BookTitle => "Book title",
            Self::ConferenceTitle => "Conference",
            Self::Volume => "Volume",
            Self::Issue => "Issue",
            Self::PageRange => "Pages",
            Self::Year => "Year",
            Self::PublicationDate => "Publication date",
            Self::Publisher => "Publisher",
            Self::Institution => "Institution",
            Self::DegreeType => "Degree",
            Self::NumPages => "Number of pages",
            Self::Doi => "DOI",
            Self::ArxivId => "arXiv ID",
            Self::Isbn => "ISBN",
            Self::Categories => "Categories",
            Self::License => "License",
            Self::Note => "Note",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| ImportError::UnknownField(s.to_string()))
    }
}

// ─── Values ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
}

impl Contributor {
    pub fn new(name: impl Into<String>, affiliation: Option<String>) -> Self {
        Self {
            name: name.into(),
            affiliation,
        }
    }
}

impl fmt::Display for Contributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.affiliation {
            Some(aff) => write!(f, "{} ({})", self.name, aff),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Contributors(Vec<Contributor>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Contributors(list) => list.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Contributors(_) => None,
        }
    }

    pub fn as_contributors(&self) -> Option<&[Contributor]> {
        match self {
            Self::Contributors(list) => Some(list),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Contributors(list) => {
                for (i, c) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{c}")?;
                }
                Ok(())
            }
        }
    }
}

// ─── Canonical field mapping ─────────────────────────────────────────────────

/// Field id → value. Never holds an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FieldMapping(BTreeMap<FieldId, FieldValue>);

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` unless it is empty. Returns whether it was stored.
    pub fn insert(&mut self, field: FieldId, value: FieldValue) -> bool {
        if value.is_empty() {
            return false;
        }
        self.0.insert(field, value);
        true
    }

    pub fn insert_text(&mut self, field: FieldId, value: impl Into<String>) -> bool {
        let value = value.into();
        self.insert(field, FieldValue::Text(value.trim().to_string()))
    }

    pub fn insert_opt(&mut self, field: FieldId, value: Option<impl Into<String>>) -> bool {
        match value {
            Some(v) => self.insert_text(field, v),
            None => false,
        }
    }

    pub fn get(&self, field: FieldId) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn text(&self, field: FieldId) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.0.contains_key(&field)
    }

    /// Shallow merge where `other` wins on shared keys.
    pub fn overlay(&mut self, other: FieldMapping) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

impl<'de> Deserialize<'de> for FieldMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<FieldId, FieldValue>::deserialize(deserializer).map(Self::from_iter)
    }
}

impl IntoIterator for FieldMapping {
    type Item = (FieldId, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<FieldId, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(FieldId, FieldValue)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (FieldId, FieldValue)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (field, value) in iter {
            mapping.insert(field, value);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_parses_case_insensitively() {
        assert_eq!("Thesis".parse::<DocumentType>().unwrap(), DocumentType::Thesis);
        assert_eq!(" book ".parse::<DocumentType>().unwrap(), DocumentType::Book);
        assert!("poster".parse::<DocumentType>().is_err());
    }

    #[test]
    fn field_id_roundtrips_through_str() {
        for field in FieldId::ALL {
            assert_eq!(field.as_str().parse::<FieldId>().unwrap(), field);
        }
        assert!("colour".parse::<FieldId>().is_err());
    }

    #[test]
    fn field_id_serde_name_matches_as_str() {
        let json = serde_json::to_string(&FieldId::JournalTitle).unwrap();
        assert_eq!(json, "\"journal_title\"");
        let json = serde_json::to_string(&FieldId::Abstract).unwrap();
        assert_eq!(json, "\"abstract\"");
    }

    #[test]
    fn mapping_rejects_empty_values() {
        let mut m = FieldMapping::new();
        assert!(!m.insert_text(FieldId::Title, "   "));
        assert!(!m.insert(FieldId::Authors, FieldValue::Contributors(vec![])));
        assert!(!m.insert_opt(FieldId::Year, None::<String>));
        assert!(m.is_empty());
    }

    #[test]
    fn mapping_trims_text() {
        let mut m = FieldMapping::new();
        m.insert_text(FieldId::Title, "  Dark matter  ");
        assert_eq!(m.text(FieldId::Title), Some("Dark matter"));
    }

    #[test]
    fn overlay_prefers_incoming_values() {
        let mut base = FieldMapping::new();
        base.insert_text(FieldId::Title, "Common");
        base.insert_text(FieldId::Year, "2019");
        let mut special = FieldMapping::new();
        special.insert_text(FieldId::Title, "Special");

        base.overlay(special);
        assert_eq!(base.text(FieldId::Title), Some("Special"));
        assert_eq!(base.text(FieldId::Year), Some("2019"));
    }

    #[test]
    fn contributors_display_with_affiliation() {
        let value = FieldValue::Contributors(vec![
            Contributor::new("Ellis, John", Some("CERN".to_string())),
            Contributor::new("Witten, Edward", None),
        ]);
        assert_eq!(value.to_string(), "Ellis, John (CERN); Witten, Edward");
    }

    #[test]
    fn deserialized_mapping_drops_empty_values() {
        let m: FieldMapping =
            serde_json::from_str(r#"{"title": "", "year": "2020", "authors": []}"#).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m.text(FieldId::Year), Some("2020"));
        assert!(!m.contains(FieldId::Title));
    }
}
