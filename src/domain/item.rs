//! Item domain model
//!
//! Items are the decidable units in a deck: a pending invite or a
//! candidate person. The payload is whatever the backend returned and is
//! never interpreted beyond a few read-only display helpers.

use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// Lifecycle state of an item within a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Pending,
    Processed,
}

impl ItemStatus {
    /// Returns true if a decision has been committed for the item
    pub fn is_processed(&self) -> bool {
        matches!(self, ItemStatus::Processed)
    }
}

/// Opaque display payload for an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemPayload(serde_json::Map<String, serde_json::Value>);

impl ItemPayload {
    /// Creates an empty payload
    pub fn new() -> Self {
        Self(serde_json::Map::new())
    }

    /// Gets a value by key
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Gets a string value by key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    /// Returns true if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all key-value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }

    /// Best-effort headline for display (`title`, then `name`, then `label`)
    pub fn title(&self) -> Option<&str> {
        ["title", "name", "label"]
            .iter()
            .find_map(|key| self.get_str(key))
    }

    /// Best-effort secondary line for display
    pub fn subtitle(&self) -> Option<&str> {
        ["subtitle", "location", "city", "host", "description"]
            .iter()
            .find_map(|key| self.get_str(key))
    }

    /// Returns the payload as a JSON value
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::Object(self.0.clone())
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for ItemPayload {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

/// A decidable unit in a swipe queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique, stable identifier
    pub id: ItemId,

    /// Display payload (not interpreted by the engine)
    #[serde(flatten)]
    pub payload: ItemPayload,
}

impl Item {
    /// Creates an item with an empty payload
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            payload: ItemPayload::new(),
        }
    }

    /// Creates an item with the given payload
    pub fn with_payload(id: ItemId, payload: impl Into<ItemPayload>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    /// Creates an item from a JSON object, deriving an ID when none is given
    pub fn from_record(
        mut record: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, super::IdError> {
        let id = match record.remove("id") {
            Some(serde_json::Value::String(s)) => s.parse()?,
            Some(serde_json::Value::Number(n)) => n.to_string().parse()?,
            Some(serde_json::Value::Null) | None => {
                ItemId::derived(&serde_json::Value::Object(record.clone()))
            }
            Some(other) => other.to_string().parse()?,
        };
        Ok(Self::with_payload(id, record))
    }

    /// Display headline, falling back to the ID
    pub fn display_title(&self) -> &str {
        self.payload.title().unwrap_or(self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn from_record_uses_explicit_id() {
        let item = Item::from_record(record(json!({"id": "inv-1", "title": "Rooftop"}))).unwrap();
        assert_eq!(item.id.as_str(), "inv-1");
        assert_eq!(item.display_title(), "Rooftop");
        assert!(item.payload.get("id").is_none());
    }

    #[test]
    fn from_record_accepts_numeric_id() {
        let item = Item::from_record(record(json!({"id": 17, "name": "Ana"}))).unwrap();
        assert_eq!(item.id.as_str(), "17");
    }

    #[test]
    fn from_record_derives_missing_id() {
        let item = Item::from_record(record(json!({"name": "Ana"}))).unwrap();
        assert!(item.id.is_derived());
    }

    #[test]
    fn from_record_rejects_blank_id() {
        assert!(Item::from_record(record(json!({"id": "  "}))).is_err());
    }

    #[test]
    fn display_title_falls_back_to_id() {
        let item = Item::new("p-9".parse().unwrap());
        assert_eq!(item.display_title(), "p-9");
    }

    #[test]
    fn serialize_flattens_payload() {
        let item = Item::from_record(record(json!({"id": "x", "city": "Lisbon"}))).unwrap();
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value, json!({"id": "x", "city": "Lisbon"}));
        assert_eq!(item.payload.subtitle(), Some("Lisbon"));
    }

    #[test]
    fn status_default_is_pending() {
        assert_eq!(ItemStatus::default(), ItemStatus::Pending);
        assert!(!ItemStatus::Pending.is_processed());
        assert!(ItemStatus::Processed.is_processed());
    }
}
