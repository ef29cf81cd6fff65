use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

// New style: YYMM.NNNN or YYMM.NNNNN, optional version
static ARXIV_NEW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}\.\d{4,5}(v\d+)?$").expect("valid regex"));

// Old style: archive(.XX)/YYMMNNN, optional version
static ARXIV_OLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z\-]+(\.[A-Z]{2})?/\d{7}(v\d+)?$").expect("valid regex")
});

const DOI_PREFIXES: [&str; 6] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
    "DOI:",
];

const ARXIV_PREFIXES: [&str; 4] = [
    "https://arxiv.org/abs/",
    "http://arxiv.org/abs/",
    "arxiv:",
    "arXiv:",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Doi,
    Arxiv,
    Isbn,
}

impl IdentifierKind {
    /// Name used in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Doi => "DOI",
            Self::Arxiv => "arXiv",
            Self::Isbn => "ISBN",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A user-entered identifier with its scheme prefix stripped and whitespace trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub kind: IdentifierKind,
    pub raw: String,
    pub value: String,
}

impl Identifier {
    pub fn new(kind: IdentifierKind, raw: &str) -> Self {
        let value = match kind {
            IdentifierKind::Doi => strip_prefixes(raw, &DOI_PREFIXES),
            IdentifierKind::Arxiv => {
                strip_prefixes(raw, &ARXIV_PREFIXES).trim_end_matches(".pdf").to_string()
            }
            IdentifierKind::Isbn => raw
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '-')
                .collect::<String>()
                .to_uppercase(),
        };
        Self {
            kind,
            raw: raw.to_string(),
            value,
        }
    }

    pub fn doi(raw: &str) -> Self {
        Self::new(IdentifierKind::Doi, raw)
    }

    pub fn arxiv(raw: &str) -> Self {
        Self::new(IdentifierKind::Arxiv, raw)
    }

    pub fn isbn(raw: &str) -> Self {
        Self::new(IdentifierKind::Isbn, raw)
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Checks the normalized value is well formed for its scheme.
    pub fn validate(&self) -> Result<()> {
        if self.value.is_empty() {
            return Err(ImportError::EmptyIdentifier);
        }
        let ok = match self.kind {
            IdentifierKind::Doi => is_valid_doi(&self.value),
            IdentifierKind::Arxiv => {
                ARXIV_NEW.is_match(&self.value) || ARXIV_OLD.is_match(&self.value)
            }
            IdentifierKind::Isbn => is_valid_isbn(&self.value),
        };
        if ok {
            return Ok(());
        }
        Err(match self.kind {
            IdentifierKind::Doi => ImportError::InvalidDoi(self.raw.clone()),
            IdentifierKind::Arxiv => ImportError::InvalidArxivId(self.raw.clone()),
            IdentifierKind::Isbn => ImportError::InvalidIsbn(self.raw.clone()),
        })
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

fn strip_prefixes(raw: &str, prefixes: &[&str]) -> String {
    let input = raw.trim();
    prefixes
        .iter()
        .find_map(|p| input.strip_prefix(p))
        .unwrap_or(input)
        .trim()
        .to_string()
}

fn is_valid_doi(value: &str) -> bool {
    if !value.starts_with("10.") {
        return false;
    }
    match value.find('/') {
        Some(pos) => !value[pos + 1..].is_empty(),
        None => false,
    }
}

fn is_valid_isbn(value: &str) -> bool {
    match value.len() {
        10 => {
            let mut sum = 0u32;
            for (i, c) in value.chars().enumerate() {
                let d = match c {
                    '0'..='9' => c as u32 - '0' as u32,
                    'X' if i == 9 => 10,
                    _ => return false,
                };
                sum += (10 - i as u32) * d;
            }
            sum % 11 == 0
        }
        13 => {
            let mut sum = 0u32;
            for (i, c) in value.chars().enumerate() {
                let Some(d) = c.to_digit(10) else {
                    return false;
                };
                sum += if i % 2 == 0 { d } else { d * 3 };
            }
            sum % 10 == 0
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doi_prefix_is_stripped() {
        assert_eq!(Identifier::doi("doi:10.1000/xyz123").value, "10.1000/xyz123");
        assert_eq!(Identifier::doi("  DOI: 10.1000/xyz123 ").value, "10.1000/xyz123");
        assert_eq!(
            Identifier::doi("https://doi.org/10.1103/PhysRevD.98.030001").value,
            "10.1103/PhysRevD.98.030001"
        );
    }

    #[test]
    fn doi_validation() {
        assert!(Identifier::doi("10.1000/xyz123").validate().is_ok());
        assert!(Identifier::doi("10.1000").validate().is_err());
        assert!(Identifier::doi("not-a-doi").validate().is_err());
        assert!(matches!(
            Identifier::doi("   ").validate(),
            Err(ImportError::EmptyIdentifier)
        ));
    }

    #[test]
    fn arxiv_prefix_is_stripped() {
        assert_eq!(Identifier::arxiv("arXiv:1207.7214").value, "1207.7214");
        assert_eq!(Identifier::arxiv("arxiv:1207.7214v2").value, "1207.7214v2");
        assert_eq!(
            Identifier::arxiv("https://arxiv.org/abs/hep-th/9711200").value,
            "hep-th/9711200"
        );
    }

    #[test]
    fn arxiv_validation() {
        assert!(Identifier::arxiv("1207.7214").validate().is_ok());
        assert!(Identifier::arxiv("2301.04567v3").validate().is_ok());
        assert!(Identifier::arxiv("hep-th/9711200").validate().is_ok());
        assert!(Identifier::arxiv("math.GT/0309136").validate().is_ok());
        assert!(Identifier::arxiv("123.456").validate().is_err());
        assert!(Identifier::arxiv("higgs").validate().is_err());
    }

    #[test]
    fn isbn_is_compacted() {
        assert_eq!(Identifier::isbn("978-0-306-40615-7").value, "9780306406157");
        assert_eq!(Identifier::isbn("0 8044 2957 x").value, "080442957X");
    }

    #[test]
    fn isbn_check_digits() {
        assert!(Identifier::isbn("978-0-306-40615-7").validate().is_ok());
        assert!(Identifier::isbn("0-306-40615-2").validate().is_ok());
        assert!(Identifier::isbn("080442957X").validate().is_ok());
        assert!(Identifier::isbn("978-0-306-40615-8").validate().is_err());
        assert!(Identifier::isbn("12345").validate().is_err());
    }
}
