mod local;

pub use local::LocalStore;

use crate::redirect::RedirectRule;
use async_trait::async_trait;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Rule not found: {0}")]
    NotFound(String),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),
}

/// Abstraction for redirect rule persistence
/// Implementations can be file-backed (single-node) or remote
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Ordered snapshot of all rules. List order is match precedence.
    async fn list(&self) -> StoreResult<Vec<RedirectRule>>;

    /// Validate and persist a new rule, assigning its id and creation time.
    /// An appended rule matches after every existing rule.
    async fn create(
        &self,
        source: String,
        destination: String,
        permanent: bool,
    ) -> StoreResult<RedirectRule>;

    /// Remove a rule by id.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}
