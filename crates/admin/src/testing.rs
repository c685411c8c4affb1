//! In-memory backend recording every request, for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use emporium_core::Entity;
use serde_json::Value;

use crate::api::{ApiError, EntityApi, QueryParams};
use crate::resolve::Navigator;

/// Navigator recording `back` and route changes in order.
#[derive(Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<String>>,
}

#[allow(clippy::unwrap_used)]
impl RecordingNavigator {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[allow(clippy::unwrap_used)]
impl Navigator for RecordingNavigator {
    fn back(&self) {
        self.events.lock().unwrap().push("back".to_string());
    }

    fn navigate(&self, route: &str) {
        self.events.lock().unwrap().push(route.to_string());
    }
}

/// A request received by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Find(&'static str, i64),
    Query(&'static str),
    Create(&'static str),
    Update(&'static str, i64),
    PartialUpdate(&'static str, i64),
    Delete(&'static str, i64),
}

/// Serves every entity type from JSON documents keyed by resource.
pub struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    store: Mutex<HashMap<&'static str, Vec<Value>>>,
    failing: Vec<&'static str>,
    fail_all: bool,
    stall_writes: bool,
    next_id: AtomicI64,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            store: Mutex::new(HashMap::new()),
            failing: Vec::new(),
            fail_all: false,
            stall_writes: false,
            next_id: AtomicI64::new(1000),
        }
    }
}

#[allow(clippy::unwrap_used)]
impl RecordingBackend {
    /// Seed entities of one type.
    pub fn with<E: Entity>(self, entities: Vec<E>) -> Self {
        self.store
            .lock()
            .unwrap()
            .entry(E::RESOURCE)
            .or_default()
            .extend(entities.iter().map(|e| serde_json::to_value(e).unwrap()));
        self
    }

    /// Fail every request with a 503.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Fail requests for one resource with a 503.
    pub fn failing_on(mut self, resource: &'static str) -> Self {
        self.failing.push(resource);
        self
    }

    /// Record creates and updates but never answer them.
    pub fn stalling_writes(mut self) -> Self {
        self.stall_writes = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Stored entities of one type.
    pub fn stored<E: Entity>(&self) -> Vec<E> {
        self.store
            .lock()
            .unwrap()
            .get(E::RESOURCE)
            .map(|values| {
                values
                    .iter()
                    .map(|v| serde_json::from_value(v.clone()).unwrap())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn record<E: Entity>(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.fail_all || self.failing.contains(&E::RESOURCE) {
            return Err(ApiError::Api {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn stall(&self) {
        if self.stall_writes {
            std::future::pending::<()>().await;
        }
    }

    fn raw_id<E: Entity>(id: E::Id) -> i64 {
        serde_json::to_value(id).unwrap().as_i64().unwrap()
    }

    fn position(values: &[Value], id: i64) -> Option<usize> {
        values
            .iter()
            .position(|v| v.get("id").and_then(Value::as_i64) == Some(id))
    }

    fn parse<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ApiError> {
        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
#[allow(clippy::unwrap_used)]
impl<E: Entity> EntityApi<E> for RecordingBackend {
    async fn find(&self, id: E::Id) -> Result<Option<E>, ApiError> {
        let id = Self::raw_id::<E>(id);
        self.record::<E>(Call::Find(E::RESOURCE, id))?;

        let store = self.store.lock().unwrap();
        let found = store
            .get(E::RESOURCE)
            .and_then(|values| Self::position(values, id).and_then(|i| values.get(i)))
            .cloned();
        drop(store);

        found.map(Self::parse).transpose()
    }

    async fn query(&self, _params: &QueryParams) -> Result<Vec<E>, ApiError> {
        self.record::<E>(Call::Query(E::RESOURCE))?;
        Ok(self.stored())
    }

    async fn create(&self, entity: &E::New) -> Result<E, ApiError> {
        self.record::<E>(Call::Create(E::RESOURCE))?;
        self.stall().await;

        let mut value = serde_json::to_value(entity).unwrap();
        value["id"] = Value::from(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.store
            .lock()
            .unwrap()
            .entry(E::RESOURCE)
            .or_default()
            .push(value.clone());
        Self::parse(value)
    }

    async fn update(&self, entity: &E) -> Result<E, ApiError> {
        let id = Self::raw_id::<E>(entity.id());
        self.record::<E>(Call::Update(E::RESOURCE, id))?;
        self.stall().await;

        let value = serde_json::to_value(entity).unwrap();
        let mut store = self.store.lock().unwrap();
        let values = store.entry(E::RESOURCE).or_default();
        match Self::position(values, id) {
            Some(i) => values[i] = value.clone(),
            None => values.push(value.clone()),
        }
        drop(store);
        Self::parse(value)
    }

    async fn partial_update(&self, id: E::Id, patch: &Value) -> Result<E, ApiError> {
        let id = Self::raw_id::<E>(id);
        self.record::<E>(Call::PartialUpdate(E::RESOURCE, id))?;

        let mut store = self.store.lock().unwrap();
        let values = store.entry(E::RESOURCE).or_default();
        let Some(i) = Self::position(values, id) else {
            return Err(ApiError::Api {
                status: 404,
                message: "Not Found".to_string(),
            });
        };
        if let (Some(target), Some(fields)) = (values[i].as_object_mut(), patch.as_object()) {
            for (key, field) in fields {
                target.insert(key.clone(), field.clone());
            }
        }
        let value = values[i].clone();
        drop(store);
        Self::parse(value)
    }

    async fn delete(&self, id: E::Id) -> Result<(), ApiError> {
        let id = Self::raw_id::<E>(id);
        self.record::<E>(Call::Delete(E::RESOURCE, id))?;

        if let Some(values) = self.store.lock().unwrap().get_mut(E::RESOURCE) {
            values.retain(|v| v.get("id").and_then(Value::as_i64) != Some(id));
        }
        Ok(())
    }
}
