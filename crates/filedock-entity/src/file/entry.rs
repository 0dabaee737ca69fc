//! Polymorphic reference to the host entity a file is attached to.

use std::fmt;

use serde::{Deserialize, Serialize};

use filedock_core::error::AppError;

/// Tagged reference `{entity_type, entity_id}` to an owning entry.
///
/// The registry never interprets the id; hosts resolve it through an entry
/// resolver registered for `entity_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryRef {
    /// Host entity type, e.g. `"posts"` or `"users"`.
    pub entity_type: String,
    /// Host identifier of the entity.
    pub entity_id: String,
}

impl EntryRef {
    /// Build a reference, rejecting blank parts.
    pub fn new(
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Result<Self, AppError> {
        let entity_type = entity_type.into().trim().to_string();
        let entity_id = entity_id.into().trim().to_string();
        if entity_type.is_empty() || entity_id.is_empty() {
            return Err(AppError::validation(
                "Entry reference needs both an entity type and an entity id",
            ));
        }
        Ok(Self {
            entity_type,
            entity_id,
        })
    }

    /// Rebuild a reference from nullable columns; both must be set.
    pub fn from_parts(entity_type: Option<String>, entity_id: Option<String>) -> Option<Self> {
        match (entity_type, entity_id) {
            (Some(entity_type), Some(entity_id)) => Some(Self {
                entity_type,
                entity_id,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.entity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_validates() {
        let entry = EntryRef::new(" posts ", "42").expect("valid");
        assert_eq!(entry.to_string(), "posts:42");
        assert!(EntryRef::new("posts", " ").is_err());
    }

    #[test]
    fn test_from_parts_requires_both() {
        assert!(EntryRef::from_parts(Some("posts".into()), None).is_none());
        assert!(EntryRef::from_parts(Some("posts".into()), Some("1".into())).is_some());
    }
}
