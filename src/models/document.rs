use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One content source supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Short label used in stage inputs and reports (e.g. "source-1")
    pub label: String,
    /// URL handed to the content fetcher
    pub url: String,
}

impl SourceSpec {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// The source set of a run, fixed at construction to one or two entries
#[derive(Debug, Clone)]
pub enum Sources {
    Single(SourceSpec),
    Pair(SourceSpec, SourceSpec),
}

impl Sources {
    pub fn single(source: SourceSpec) -> Self {
        Self::Single(source)
    }

    pub fn pair(primary: SourceSpec, secondary: SourceSpec) -> Self {
        Self::Pair(primary, secondary)
    }

    /// Sources in caller order
    pub fn iter(&self) -> impl Iterator<Item = &SourceSpec> {
        let (first, second) = match self {
            Self::Single(a) => (a, None),
            Self::Pair(a, b) => (a, Some(b)),
        };
        std::iter::once(first).chain(second)
    }

    pub fn count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Pair(_, _) => 2,
        }
    }

    /// True when stage results and merged inputs need per-source labels
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Pair(_, _))
    }
}

/// Raw text fetched from one source, immutable for the rest of the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The source this document came from
    pub source: SourceSpec,
    /// Page title reported by the scrape provider, when present
    pub title: Option<String>,
    /// Extracted markdown body
    pub body: String,
    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

impl Document {
    pub fn new(source: SourceSpec, title: Option<String>, body: String) -> Self {
        Self {
            source,
            title,
            body,
            fetched_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_iter_order() {
        let sources = Sources::pair(
            SourceSpec::new("source-1", "https://a.example"),
            SourceSpec::new("source-2", "https://b.example"),
        );
        let labels: Vec<&str> = sources.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["source-1", "source-2"]);
        assert_eq!(sources.count(), 2);
        assert!(sources.is_multi());
    }

    #[test]
    fn test_single_source_is_not_multi() {
        let sources = Sources::single(SourceSpec::new("source-1", "https://a.example"));
        assert_eq!(sources.count(), 1);
        assert!(!sources.is_multi());
        assert_eq!(sources.iter().count(), 1);
    }

    #[test]
    fn test_document_serializes_with_source() {
        let doc = Document::new(
            SourceSpec::new("source-1", "https://a.example"),
            Some("A Headline".to_string()),
            "Body text".to_string(),
        );
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"label\":\"source-1\""));
        assert!(json.contains("\"title\":\"A Headline\""));
    }
}
