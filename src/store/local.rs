use super::{RuleStore, StoreError, StoreResult};
use crate::redirect::{RedirectRule, lint_rule, validate_redirect_pattern};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

/// JSON-file-backed rule store for single-node deployments.
///
/// The file holds an ordered array of rules; the same format works as a
/// build-time bundled rule set for environments without live storage access.
pub struct LocalStore {
    path: PathBuf,
    rules: RwLock<Vec<RedirectRule>>,
}

impl LocalStore {
    /// Open a store at `path`, loading existing rules if the file exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let rules = if path.exists() {
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read rules file: {:?}", path))?;

            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse rules file: {:?}", path))?
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            rules: RwLock::new(rules),
        })
    }

    async fn persist(&self, rules: &[RedirectRule]) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(rules)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl RuleStore for LocalStore {
    async fn list(&self) -> StoreResult<Vec<RedirectRule>> {
        Ok(self.rules.read().await.clone())
    }

    async fn create(
        &self,
        source: String,
        destination: String,
        permanent: bool,
    ) -> StoreResult<RedirectRule> {
        if source.is_empty() || destination.is_empty() {
            return Err(StoreError::InvalidRule(
                "source and destination must be non-empty".to_string(),
            ));
        }

        let validation = validate_redirect_pattern(&source);
        if !validation.valid {
            return Err(StoreError::InvalidRule(validation.error.unwrap_or_else(
                || "source pattern failed to compile".to_string(),
            )));
        }

        // Advisory only: the rule is stored and matched as authored
        for warning in lint_rule(&source, &destination) {
            warn!(source = %source, destination = %destination, "{warning}");
        }

        let rule = RedirectRule {
            id: Uuid::new_v4().to_string(),
            source,
            destination,
            permanent,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let mut rules = self.rules.write().await;
        rules.push(rule.clone());
        self.persist(&rules).await?;

        Ok(rule)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut rules = self.rules.write().await;

        let before = rules.len();
        rules.retain(|rule| rule.id != id);
        if rules.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }

        self.persist(&rules).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::match_redirect;

    fn rules_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("redirects.json")
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(rules_path(&dir)).await.unwrap();

        let rule = store
            .create("/tours/{{slug}}".to_string(), "/trips/{{slug}}".to_string(), true)
            .await
            .unwrap();

        assert!(!rule.id.is_empty());
        assert!(rule.created_at.ends_with('Z'));
        assert!(rule.permanent);
    }

    #[tokio::test]
    async fn test_create_rejects_uncompilable_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(rules_path(&dir)).await.unwrap();

        let err = store
            .create("/tours/{{slug".to_string(), "/trips".to_string(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRule(_)));

        let err = store
            .create(String::new(), "/trips".to_string(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRule(_)));
    }

    #[tokio::test]
    async fn test_rules_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = rules_path(&dir);

        let store = LocalStore::open(&path).await.unwrap();
        store
            .create("/a".to_string(), "/b".to_string(), true)
            .await
            .unwrap();
        store
            .create("/tours/{{slug}}".to_string(), "/trips/{{slug}}".to_string(), false)
            .await
            .unwrap();

        let reopened = LocalStore::open(&path).await.unwrap();
        let rules = reopened.list().await.unwrap();
        assert_eq!(rules.len(), 2);

        // Insertion order is match precedence and must survive the round trip
        assert_eq!(rules[0].source, "/a");
        assert_eq!(rules[1].source, "/tours/{{slug}}");

        let result = match_redirect("/tours/langtang-trek", &rules).unwrap();
        assert_eq!(result.destination, "/trips/langtang-trek");
    }

    #[tokio::test]
    async fn test_delete_removes_rule() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(rules_path(&dir)).await.unwrap();

        let rule = store
            .create("/a".to_string(), "/b".to_string(), true)
            .await
            .unwrap();

        store.delete(&rule.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        let err = store.delete(&rule.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(rules_path(&dir)).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
