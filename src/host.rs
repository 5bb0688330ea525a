//! Access to the host's entity states.
//!
//! The dashboard runtime owns entity state; the card only ever asks for the
//! latest attributes of one entity id. [`StateProvider`] is that seam, and
//! [`HostStates`] is an in-memory snapshot of it, loadable from the JSON a
//! host returns for its state listing.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Latest-snapshot lookup of entity attributes.
pub trait StateProvider {
    /// Attributes of `entity_id`, `None` when the host has no such entity.
    fn attributes(&self, entity_id: &str) -> Option<&Value>;
}

impl<P: StateProvider + ?Sized> StateProvider for &P {
    fn attributes(&self, entity_id: &str) -> Option<&Value> {
        (**self).attributes(entity_id)
    }
}

/// Errors that can occur when loading a state snapshot.
#[derive(Debug, Error)]
pub enum StatesLoadError {
    #[error("failed to read states file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse states JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// One entity as the host reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    #[serde(default)]
    pub state: Value,
    #[serde(default)]
    pub attributes: Value,
}

#[derive(Debug, Clone, Deserialize)]
struct ListedEntity {
    entity_id: String,
    #[serde(flatten)]
    state: EntityState,
}

/// Accepted snapshot layouts: the host's state listing (an array of
/// entities carrying their id) or a map keyed by entity id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SnapshotLayout {
    Listing(Vec<ListedEntity>),
    Keyed(HashMap<String, EntityState>),
}

/// In-memory snapshot of host entity states.
///
/// ```rust
/// use parcelview::{HostStates, StateProvider};
///
/// let states = HostStates::from_json(r#"[
///     {"entity_id": "sensor.postnl", "state": "2", "attributes": {"parcels": []}}
/// ]"#).unwrap();
///
/// assert!(states.attributes("sensor.postnl").is_some());
/// assert!(states.attributes("sensor.dhl").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostStates {
    entities: HashMap<String, EntityState>,
}

impl HostStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StatesLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, StatesLoadError> {
        let layout: SnapshotLayout = serde_json::from_str(json)?;
        let entities = match layout {
            SnapshotLayout::Listing(listing) => listing
                .into_iter()
                .map(|entity| (entity.entity_id, entity.state))
                .collect(),
            SnapshotLayout::Keyed(entities) => entities,
        };
        Ok(Self { entities })
    }

    /// Sets (or replaces) one entity's attributes.
    pub fn insert(&mut self, entity_id: impl Into<String>, attributes: Value) {
        self.entities.insert(
            entity_id.into(),
            EntityState {
                state: Value::Null,
                attributes,
            },
        );
    }

    /// Drops an entity, as when an integration is removed.
    pub fn remove(&mut self, entity_id: &str) -> Option<EntityState> {
        self.entities.remove(entity_id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl StateProvider for HostStates {
    fn attributes(&self, entity_id: &str) -> Option<&Value> {
        self.entities.get(entity_id).map(|entity| &entity.attributes)
    }
}

impl StateProvider for HashMap<String, Value> {
    fn attributes(&self, entity_id: &str) -> Option<&Value> {
        self.get(entity_id)
    }
}
