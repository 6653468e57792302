//! View parameters for list screens
//!
//! List pages keep their pagination, search and sort state in the URL query
//! string. [`ViewParams`] is that state as an explicit value: decoded from a
//! query string, handed to the list query, and encoded back when navigating.

use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Hard upper bound for `per_page`
pub const MAX_PER_PAGE: u32 = 100;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

/// Pagination, search and ordering state of a list screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewParams {
    /// Page number (1-based, default: 1)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page (default: 20, max: 100)
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Search keyword
    #[serde(default)]
    pub search: Option<String>,

    /// Sort field (default: order)
    #[serde(default = "default_sort_field")]
    pub sort_by: String,

    #[serde(default)]
    pub direction: SortDirection,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

fn default_sort_field() -> String {
    "order".to_string()
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            search: None,
            sort_by: default_sort_field(),
            direction: SortDirection::default(),
        }
    }
}

impl ViewParams {
    /// Get the row offset of the first item on this page
    pub fn offset(&self) -> u64 {
        (self.page.max(1) - 1) as u64 * self.limit() as u64
    }

    /// Get the limit (clamped to 1..=100)
    pub fn limit(&self) -> u32 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    /// Inclusive row range `(from, to)` for a `Range` header
    pub fn range(&self) -> (u64, u64) {
        let from = self.offset();
        (from, from + self.limit() as u64 - 1)
    }

    /// Trimmed, non-empty search term
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Same view on another page
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// New search resets pagination to the first page
    pub fn with_search(&self, search: impl Into<String>) -> Self {
        let search = search.into();
        Self {
            page: 1,
            search: if search.trim().is_empty() {
                None
            } else {
                Some(search)
            },
            ..self.clone()
        }
    }

    /// Decode from a URL query string (with or without the leading `?`).
    ///
    /// Unknown keys are ignored and malformed numbers fall back to defaults.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(value);
            match key {
                "page" => params.page = value.parse().unwrap_or(default_page()).max(1),
                "per_page" => params.per_page = value.parse().unwrap_or(default_per_page()),
                "search" => {
                    params.search = Some(value).filter(|s| !s.trim().is_empty());
                }
                "sort_by" if !value.is_empty() => params.sort_by = value,
                "direction" => params.direction = SortDirection::parse(&value),
                _ => {}
            }
        }

        params
    }

    /// Encode as a URL query string (without the leading `?`).
    ///
    /// Fields equal to their default are omitted to keep URLs short.
    pub fn to_query_string(&self) -> String {
        let defaults = Self::default();
        let mut parts = Vec::new();

        if self.page != defaults.page {
            parts.push(format!("page={}", self.page));
        }
        if self.per_page != defaults.per_page {
            parts.push(format!("per_page={}", self.per_page));
        }
        if let Some(term) = self.search_term() {
            parts.push(format!(
                "search={}",
                utf8_percent_encode(term, NON_ALPHANUMERIC)
            ));
        }
        if self.sort_by != defaults.sort_by {
            parts.push(format!(
                "sort_by={}",
                utf8_percent_encode(&self.sort_by, NON_ALPHANUMERIC)
            ));
        }
        if self.direction != defaults.direction {
            parts.push(format!("direction={}", self.direction.as_str()));
        }

        parts.join("&")
    }
}

fn decode_component(value: &str) -> String {
    let value = value.replace('+', " ");
    percent_decode_str(&value).decode_utf8_lossy().into_owned()
}
