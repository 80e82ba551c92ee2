//! Normalized provider response.

use serde::{Deserialize, Serialize};

/// Metadata for one item, normalized across providers.
///
/// Every field is optional; an all-absent response is the resolver's way of
/// saying "unknown code" without failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Which provider the data came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Comma-joined author list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    /// Secondary cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

impl ProviderResponse {
    /// True when the provider returned no usable field data at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.authors.is_none()
            && self.publisher.is_none()
            && self.year.is_none()
            && self.pages.is_none()
            && self.cover_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_response_is_empty() {
        assert!(ProviderResponse::default().is_empty());
    }

    #[test]
    fn test_response_with_any_field_is_not_empty() {
        let response = ProviderResponse {
            title: Some("Foo".to_string()),
            ..Default::default()
        };
        assert!(!response.is_empty());
    }

    #[test]
    fn test_source_name_alone_is_still_empty() {
        let response = ProviderResponse {
            source_name: Some("Open Library".to_string()),
            ..Default::default()
        };
        assert!(response.is_empty());
    }
}
