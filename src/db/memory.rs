//! In-process document store, mainly for exercising handlers without Postgres.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{stamp_document, DocumentStore, StoreError};

#[derive(Debug)]
struct StoredDocument {
    id: String,
    collection: String,
    body: Value,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<StoredDocument>>,
    failure: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.documents
            .read()
            .await
            .iter()
            .filter(|d| d.collection == collection)
            .count()
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_collection_names(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        self.check()?;
        let documents = self.documents.read().await;
        let mut names: Vec<String> = Vec::new();
        for doc in documents.iter() {
            if !names.contains(&doc.collection) {
                names.push(doc.collection.clone());
            }
        }
        names.sort();
        names.truncate(limit);
        Ok(names)
    }

    async fn get_documents(
        &self,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError> {
        self.check()?;
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|d| d.collection == collection)
            .take(limit)
            .map(|d| {
                let mut body = d.body.clone();
                if let Value::Object(fields) = &mut body {
                    fields.insert("_id".to_string(), Value::String(d.id.clone()));
                }
                body
            })
            .collect())
    }

    async fn insert_document(
        &self,
        collection: &str,
        document: Value,
    ) -> Result<String, StoreError> {
        self.check()?;
        let body = stamp_document(document, Utc::now())?;
        let id = Uuid::new_v4().to_string();
        self.documents.write().await.push(StoredDocument {
            id: id.clone(),
            collection: collection.to_string(),
            body,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_then_read_in_order() {
        let store = MemoryStore::new();
        for n in 0..3 {
            store
                .insert_document("project", json!({ "title": format!("p{n}") }))
                .await
                .unwrap();
        }
        store.insert_document("contact", json!({})).await.unwrap();

        let docs = store.get_documents("project", 2).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["title"], "p0");
        assert_eq!(docs[1]["title"], "p1");
        assert!(docs[0]["_id"].is_string());
        assert_eq!(store.count("contact").await, 1);
    }

    #[tokio::test]
    async fn test_collection_names_are_distinct_and_limited() {
        let store = MemoryStore::new();
        for name in ["b", "a", "b", "c"] {
            store.insert_document(name, json!({})).await.unwrap();
        }
        assert_eq!(store.list_collection_names(10).await.unwrap(), vec!["a", "b", "c"]);
        assert_eq!(store.list_collection_names(2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_store_errors_everywhere() {
        let store = MemoryStore::failing("down");
        assert!(store.list_collection_names(10).await.is_err());
        assert!(store.get_documents("project", 12).await.is_err());
        assert!(store.insert_document("contact", json!({})).await.is_err());
    }
}
