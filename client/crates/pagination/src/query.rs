//! Query-string building for list endpoints.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Sort direction accepted by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortOrder {
    /// Wire representation of the sort direction.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page selection shared by list endpoints.
///
/// Zero values are treated as unset, matching the backend's expectation that
/// absent parameters fall back to server defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// One-based page index.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

impl PageRequest {
    /// Request a specific page with a specific size.
    pub const fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Request the first page with the given size.
    pub const fn first(limit: u32) -> Self {
        Self {
            page: None,
            limit: Some(limit),
        }
    }
}

/// Ordered, form-encoded query parameters that skip unset values.
///
/// # Examples
/// ```
/// use pagination::QueryParams;
///
/// let path = QueryParams::new()
///     .push_opt("page", Some(2))
///     .push_opt("query", None::<&str>)
///     .push("sortBy", "name")
///     .finish("/businesses");
/// assert_eq!(path, "/businesses?page=2&sortBy=name");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Start an empty parameter list.
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a parameter unconditionally.
    #[must_use]
    pub fn push(mut self, name: &'static str, value: impl Display) -> Self {
        self.pairs.push((name, value.to_string()));
        self
    }

    /// Append a parameter when it is set and renders to a non-empty string.
    #[must_use]
    pub fn push_opt<V: Display>(mut self, name: &'static str, value: Option<V>) -> Self {
        if let Some(raw) = value {
            let rendered = raw.to_string();
            if !rendered.is_empty() {
                self.pairs.push((name, rendered));
            }
        }
        self
    }

    /// Append a numeric parameter when it is set and non-zero.
    #[must_use]
    pub fn push_count(self, name: &'static str, value: Option<u32>) -> Self {
        self.push_opt(name, value.filter(|count| *count > 0))
    }

    /// Append the page and limit from a [`PageRequest`].
    #[must_use]
    pub fn page(self, request: PageRequest) -> Self {
        self.push_count("page", request.page)
            .push_count("limit", request.limit)
    }

    /// Whether no parameters were recorded.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode the parameters, without a leading `?`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.pairs {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }

    /// Append the encoded parameters to `path`, omitting `?` when empty.
    pub fn finish(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_owned()
        } else {
            format!("{path}?{}", self.encode())
        }
    }
}
