//! Item and Collection — the catalog record and its persisted envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One catalog entry. Field names in the persisted JSON keep the original
/// document's capitalized keys; unknown keys survive load/save round-trips
/// through the extension map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Assigned by the store; unique within the collection.
    pub id: u64,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "SubType")]
    pub sub_type: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ReleaseDate")]
    pub release_date: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Version")]
    pub version: f64,
    #[serde(rename = "Available")]
    pub available: bool,
    /// Set once at creation; later updates keep it unless the patch
    /// explicitly supplies a new value.
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Absent until a bulk touch stamps every record.
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Look up a field by its JSON name, known or extension.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::from(self.id)),
            "Type" => Some(Value::from(self.kind.as_str())),
            "SubType" => Some(Value::from(self.sub_type.as_str())),
            "Name" => Some(Value::from(self.name.as_str())),
            "ReleaseDate" => Some(Value::from(self.release_date.as_str())),
            "Price" => Some(Value::from(self.price)),
            "Version" => Some(Value::from(self.version)),
            "Available" => Some(Value::from(self.available)),
            "createdAt" => self.created_at.as_deref().map(Value::from),
            "updatedAt" => self.updated_at.as_deref().map(Value::from),
            other => self.extra.get(other).cloned(),
        }
    }
}

/// The full ordered collection, wrapped in the persisted envelope key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "PlaystationNetwork")]
    pub items: Vec<Item>,
}

impl Collection {
    /// The id the next created item receives.
    pub fn next_id(&self) -> u64 {
        self.items.len() as u64 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "PlaystationNetwork": [{
                "id": 1,
                "Type": "Game",
                "SubType": "Shooter",
                "Name": "Edge of Dawn",
                "ReleaseDate": "2021-06-01",
                "Price": 59.99,
                "Version": 1.0,
                "Available": true,
                "createdAt": "2021-06-01 10:00",
                "Region": "EU"
            }]
        })
    }

    #[test]
    fn envelope_and_renames_round_trip() {
        let collection: Collection = serde_json::from_value(sample()).unwrap();
        assert_eq!(collection.items.len(), 1);
        let item = &collection.items[0];
        assert_eq!(item.kind, "Game");
        assert_eq!(item.extra.get("Region"), Some(&json!("EU")));

        let back = serde_json::to_value(&collection).unwrap();
        assert_eq!(back["PlaystationNetwork"][0]["Type"], json!("Game"));
        assert_eq!(back["PlaystationNetwork"][0]["Region"], json!("EU"));
        // updatedAt was never set and must not appear
        assert!(back["PlaystationNetwork"][0]
            .as_object()
            .unwrap()
            .get("updatedAt")
            .is_none());
    }

    #[test]
    fn field_lookup_covers_known_and_extension_names() {
        let collection: Collection = serde_json::from_value(sample()).unwrap();
        let item = &collection.items[0];
        assert_eq!(item.field("Type"), Some(json!("Game")));
        assert_eq!(item.field("Price"), Some(json!(59.99)));
        assert_eq!(item.field("Region"), Some(json!("EU")));
        assert_eq!(item.field("updatedAt"), None);
        assert_eq!(item.field("NoSuchField"), None);
    }

    #[test]
    fn next_id_is_count_plus_one() {
        let collection: Collection = serde_json::from_value(sample()).unwrap();
        assert_eq!(collection.next_id(), 2);
        assert_eq!(Collection::default().next_id(), 1);
    }
}
