use serde::{Deserialize, Serialize};

/// A single persisted redirect directive.
///
/// `source` is either a literal absolute path (`/favicon.ico`) or a pattern
/// containing `{{name}}` placeholders that each match one path segment
/// (`/blog/{{year}}/{{month}}/{{slug}}`). `destination` may reference the same
/// placeholders and may be relative or absolute with scheme and host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRule {
    /// Opaque unique identifier, assigned by the storage layer.
    pub id: String,

    pub source: String,

    pub destination: String,

    /// Selects a permanent (308) vs temporary (307) redirect status.
    pub permanent: bool,

    /// ISO-8601 creation timestamp, set by the storage layer.
    pub created_at: String,
}

/// Outcome of a successful redirect lookup.
///
/// Absence of a match is represented by `None` at the call site, not by a
/// variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Final redirect location with all bound placeholders substituted.
    pub destination: String,

    pub permanent: bool,
}
