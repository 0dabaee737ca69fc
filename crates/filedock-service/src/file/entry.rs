//! Resolution of the host entries that files are attached to.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_entity::file::EntryRef;

/// A host entity as reported by its resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The reference that was resolved.
    pub reference: EntryRef,
    /// Human-readable label, if the host has one.
    pub title: Option<String>,
    /// Host-defined payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Looks up entries of one entity type.
#[async_trait]
pub trait EntryResolver: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve an entity id; `None` when the host has no such entity.
    async fn resolve(&self, entity_id: &str) -> AppResult<Option<Entry>>;
}

/// Resolver table keyed by entity type.
#[derive(Debug, Clone, Default)]
pub struct EntryResolverRegistry {
    resolvers: HashMap<String, Arc<dyn EntryResolver>>,
}

impl EntryResolverRegistry {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the resolver for `entity_type`.
    pub fn register(&mut self, entity_type: impl Into<String>, resolver: Arc<dyn EntryResolver>) {
        self.resolvers.insert(entity_type.into(), resolver);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, entity_type: impl Into<String>, resolver: Arc<dyn EntryResolver>) -> Self {
        self.register(entity_type, resolver);
        self
    }

    /// Resolve a reference through the resolver for its type.
    pub async fn resolve(&self, reference: &EntryRef) -> AppResult<Option<Entry>> {
        let resolver = self.resolvers.get(&reference.entity_type).ok_or_else(|| {
            AppError::unsupported(format!(
                "No entry resolver registered for '{}'",
                reference.entity_type
            ))
        })?;
        resolver.resolve(&reference.entity_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedock_core::error::ErrorKind;

    #[derive(Debug)]
    struct Posts;

    #[async_trait]
    impl EntryResolver for Posts {
        async fn resolve(&self, entity_id: &str) -> AppResult<Option<Entry>> {
            Ok((entity_id == "1").then(|| Entry {
                reference: EntryRef::new("posts", entity_id).unwrap(),
                title: Some("Hello".into()),
                data: serde_json::json!({ "published": true }),
            }))
        }
    }

    #[tokio::test]
    async fn test_resolve_by_type() {
        let registry = EntryResolverRegistry::new().with("posts", Arc::new(Posts));

        let found = registry
            .resolve(&EntryRef::new("posts", "1").unwrap())
            .await
            .unwrap();
        assert_eq!(found.and_then(|e| e.title).as_deref(), Some("Hello"));

        let missing = registry
            .resolve(&EntryRef::new("posts", "2").unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());

        let err = registry
            .resolve(&EntryRef::new("users", "1").unwrap())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::UnsupportedOperation));
    }
}
