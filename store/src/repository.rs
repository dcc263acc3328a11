use crate::{Result, StoreError};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// Anything stored by id.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human readable kind used in error messages ("Project", "Task", ...).
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Lookup, insert, update and delete by id.
///
/// Implementations must keep `list` in insertion order.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<T>>;

    async fn list(&self) -> Result<Vec<T>>;

    /// Stores a new item. Fails with [`StoreError::Duplicate`] if the id is taken.
    async fn insert(&self, item: T) -> Result<T>;

    /// Replaces the stored item with the same id.
    async fn update(&self, item: T) -> Result<T>;

    /// Removes and returns the item with the given id.
    async fn delete(&self, id: &str) -> Result<T>;

    async fn count(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }
}

/// A repository backed by a vector behind an async read/write lock.
pub struct InMemoryRepository<T> {
    items: RwLock<Vec<T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    fn not_found(id: &str) -> StoreError {
        StoreError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        }
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn get(&self, id: &str) -> Result<Option<T>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.items.read().await.clone())
    }

    async fn insert(&self, item: T) -> Result<T> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.id() == item.id()) {
            return Err(StoreError::Duplicate {
                kind: T::KIND,
                id: item.id().to_string(),
            });
        }
        debug!("Inserting {} {}", T::KIND, item.id());
        items.push(item.clone());
        Ok(item)
    }

    async fn update(&self, item: T) -> Result<T> {
        let mut items = self.items.write().await;
        let slot = items
            .iter_mut()
            .find(|existing| existing.id() == item.id())
            .ok_or_else(|| Self::not_found(item.id()))?;
        debug!("Updating {} {}", T::KIND, item.id());
        *slot = item.clone();
        Ok(item)
    }

    async fn delete(&self, id: &str) -> Result<T> {
        let mut items = self.items.write().await;
        let index = items
            .iter()
            .position(|existing| existing.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        debug!("Deleting {} {}", T::KIND, id);
        Ok(items.remove(index))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.items.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: String,
        body: String,
    }

    impl Entity for Note {
        const KIND: &'static str = "Note";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: id.to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = InMemoryRepository::new();
        repo.insert(note("n1", "hello")).await.unwrap();

        assert_eq!(repo.get("n1").await.unwrap(), Some(note("n1", "hello")));
        assert_eq!(repo.get("n2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_ids() {
        let repo = InMemoryRepository::with_items(vec![note("n1", "a")]);
        let err = repo.insert(note("n1", "b")).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::Duplicate {
                kind: "Note",
                id: "n1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let repo = InMemoryRepository::new();
        for id in ["b", "a", "c"] {
            repo.insert(note(id, "")).await.unwrap();
        }
        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let repo = InMemoryRepository::with_items(vec![note("n1", "a"), note("n2", "b")]);
        repo.update(note("n1", "changed")).await.unwrap();

        let items = repo.list().await.unwrap();
        assert_eq!(items[0], note("n1", "changed"));
        assert_eq!(items[1], note("n2", "b"));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let repo: InMemoryRepository<Note> = InMemoryRepository::new();
        assert!(matches!(
            repo.update(note("n1", "a")).await,
            Err(StoreError::NotFound { kind: "Note", .. })
        ));
        assert!(matches!(
            repo.delete("n1").await,
            Err(StoreError::NotFound { kind: "Note", .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_item() {
        let repo = InMemoryRepository::with_items(vec![note("n1", "a")]);
        assert_eq!(repo.delete("n1").await.unwrap(), note("n1", "a"));
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
