use crate::error::{Result, WalkerError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Document store for published populations and run results
///
/// Documents are JSON objects. Creating one returns a generated identifier
/// and stamps the stored copy with `id` and `timestamp` fields.
pub trait GenomeStore: Send + Sync {
    /// Store a population document. It must carry a `population` field.
    fn create_population(&self, document: Value) -> Result<String>;
    fn get_population(&self, id: &str) -> Result<Option<Value>>;
    fn list_populations(&self) -> Result<Vec<Value>>;

    /// Store a result document. It must carry `fitness` or `fitness_history`.
    fn create_result(&self, document: Value) -> Result<String>;
    fn get_result(&self, id: &str) -> Result<Option<Value>>;
    fn list_results(&self) -> Result<Vec<Value>>;
}

#[derive(Default)]
struct Collections {
    populations: BTreeMap<String, Value>,
    results: BTreeMap<String, Value>,
}

/// Process-local store. Contents are lost when the store is dropped.
#[derive(Default)]
pub struct InMemoryStore {
    data: Mutex<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Collections>> {
        self.data
            .lock()
            .map_err(|_| WalkerError::Storage("store lock poisoned".to_string()))
    }
}

fn require_any(document: &Value, keys: &[&str]) -> Result<()> {
    let object = document
        .as_object()
        .ok_or_else(|| WalkerError::Storage("document must be a JSON object".to_string()))?;

    if keys.iter().any(|key| object.contains_key(*key)) {
        Ok(())
    } else {
        Err(WalkerError::Storage(format!(
            "document must contain one of: {}",
            keys.join(", ")
        )))
    }
}

fn insert_stamped(
    collection: &mut BTreeMap<String, Value>,
    prefix: &str,
    mut document: Value,
) -> String {
    let now = chrono::Utc::now();
    let id = format!("{}_{}_{}", prefix, collection.len() + 1, now.timestamp());

    if let Some(object) = document.as_object_mut() {
        object.insert("id".to_string(), Value::String(id.clone()));
        object.insert("timestamp".to_string(), Value::String(now.to_rfc3339()));
    }
    collection.insert(id.clone(), document);
    id
}

impl GenomeStore for InMemoryStore {
    fn create_population(&self, document: Value) -> Result<String> {
        require_any(&document, &["population"])?;
        let mut data = self.lock()?;
        let id = insert_stamped(&mut data.populations, "gen", document);
        log::debug!("Stored population document {}", id);
        Ok(id)
    }

    fn get_population(&self, id: &str) -> Result<Option<Value>> {
        Ok(self.lock()?.populations.get(id).cloned())
    }

    fn list_populations(&self) -> Result<Vec<Value>> {
        Ok(self.lock()?.populations.values().cloned().collect())
    }

    fn create_result(&self, document: Value) -> Result<String> {
        require_any(&document, &["fitness", "fitness_history"])?;
        let mut data = self.lock()?;
        let id = insert_stamped(&mut data.results, "res", document);
        log::debug!("Stored result document {}", id);
        Ok(id)
    }

    fn get_result(&self, id: &str) -> Result<Option<Value>> {
        Ok(self.lock()?.results.get(id).cloned())
    }

    fn list_results(&self) -> Result<Vec<Value>> {
        Ok(self.lock()?.results.values().cloned().collect())
    }
}
