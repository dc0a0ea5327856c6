//! Offset/limit handling for the list endpoint.
//!
//! The service pages in windows of at most 50 records and treats 50 as its
//! default page size, so a request for exactly 50 sends no `limit` at all.
//! Omission is decided on the requested value: a larger request is capped
//! and still sent as `limit=50`.

/// Largest page the service will return.
pub const MAX_LIMIT: i64 = 50;

/// Characters stripped from the end of every relative path before dispatch.
const TRAILING_SEPARATORS: &[char] = &['&', '?', '/'];

/// Pagination window for `referees/`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl Page {
    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Self {
        Self { offset, limit }
    }

    /// Offset actually sent, or `None` when the parameter is omitted.
    pub fn effective_offset(&self) -> Option<i64> {
        match self.offset.map(|o| o.max(0)) {
            Some(0) | None => None,
            Some(o) => Some(o),
        }
    }

    /// Limit actually sent, or `None` when the parameter is omitted.
    pub fn effective_limit(&self) -> Option<i64> {
        match self.limit {
            Some(MAX_LIMIT) | None => None,
            Some(l) => Some(l.min(MAX_LIMIT)),
        }
    }

    /// Append `offset=` / `limit=` to `path`, which should end in `?`.
    pub fn apply(&self, path: &str) -> String {
        let mut url = path.to_string();
        if let Some(offset) = self.effective_offset() {
            url.push_str(&format!("offset={offset}&"));
        }
        if let Some(limit) = self.effective_limit() {
            url.push_str(&format!("limit={limit}&"));
        }
        trim_separators(&url).to_string()
    }
}

/// Strip any run of trailing `&`, `?` and `/` characters.
pub fn trim_separators(path: &str) -> &str {
    path.trim_end_matches(TRAILING_SEPARATORS)
}
