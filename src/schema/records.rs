//! Typed records for the Speckle REST resources
//!
//! Field names follow the server's camelCase wire format; the document id is
//! `_id` on the wire and `id` in Rust.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Owner of a resource: either a bare user id or an embedded profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Owner {
    Id(String),
    User(User),
}

impl Owner {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::User(user) => user.id.as_deref(),
        }
    }
}

/// Fields shared by every server-side resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBase {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_read: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_write: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_comments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

// =============================================================================
// Streams
// =============================================================================

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerProperties {
    #[serde(default)]
    pub color: Map<String, Value>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub pointsize: f64,
    #[serde(default)]
    pub linewidth: f64,
    #[serde(default)]
    pub shininess: f64,
    #[serde(default = "default_true")]
    pub smooth: bool,
    #[serde(default = "default_true")]
    pub show_edges: bool,
    #[serde(default = "default_true")]
    pub wireframe: bool,
}

impl Default for LayerProperties {
    fn default() -> Self {
        Self {
            color: Map::new(),
            visible: true,
            pointsize: 0.0,
            linewidth: 0.0,
            shininess: 0.0,
            smooth: true,
            show_edges: true,
            wireframe: true,
        }
    }
}

fn default_layer_name() -> String {
    "New Layer".to_string()
}

/// A layer inside a stream. A missing or null `guid` gets a fresh v4 UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[serde(default = "Uuid::new_v4", deserialize_with = "uuid_or_new")]
    pub guid: Uuid,
    #[serde(default = "default_layer_name")]
    pub name: String,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default)]
    pub start_index: i64,
    #[serde(default)]
    pub object_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<LayerProperties>,
}

fn uuid_or_new<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Uuid>::deserialize(deserializer)?.unwrap_or_else(Uuid::new_v4))
}

fn default_commit_message() -> String {
    "Modified stream".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    #[serde(flatten)]
    pub base: ResourceBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
    #[serde(default)]
    pub objects: Vec<SpeckleObject>,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

// =============================================================================
// Projects
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_read: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_write: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(flatten)]
    pub base: ResourceBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub streams: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
}

// =============================================================================
// Objects
// =============================================================================

/// Bookkeeping fields every stored object carries, minus `type` and `name`
/// whose defaults differ per geometry schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectFields {
    #[serde(flatten)]
    pub base: ResourceBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestors: Option<Vec<String>>,
}

/// A generic stored object whose `type` did not resolve to a geometry schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeckleObject {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fields of object types this client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// API clients
// =============================================================================

fn new_document_guid() -> String {
    Uuid::new_v4().to_string()
}

fn guid_or_new<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(new_document_guid))
}

/// A registered sender/receiver application attached to a stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiClient {
    #[serde(flatten)]
    pub base: ResourceBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_location: Option<String>,
    #[serde(default = "new_document_guid", deserialize_with = "guid_or_new")]
    pub document_guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    pub resource_type: String,
    pub resource_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_resources: Option<Vec<ResourceInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

// =============================================================================
// Accounts
// =============================================================================

/// Public profile of a user account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stream_defaults() {
        let stream: Stream = serde_json::from_value(json!({"name": "s1"})).unwrap();
        assert_eq!(stream.name.as_deref(), Some("s1"));
        assert_eq!(stream.commit_message, "Modified stream");
        assert!(stream.tags.is_empty());
        assert!(stream.base.id.is_none());
    }

    #[test]
    fn test_id_uses_underscore_alias() {
        let project: Project =
            serde_json::from_value(json!({"_id": "abc", "name": "p1"})).unwrap();
        assert_eq!(project.base.id.as_deref(), Some("abc"));

        let out = serde_json::to_value(&project).unwrap();
        assert_eq!(out["_id"], "abc");
        assert!(out.get("id").is_none());
    }

    #[test]
    fn test_layer_guid_generated_when_null() {
        let layer: Layer = serde_json::from_value(json!({"guid": null})).unwrap();
        assert_eq!(layer.name, "New Layer");
        assert_eq!(layer.guid.get_version_num(), 4);
    }

    #[test]
    fn test_api_client_gets_document_guid() {
        let client: ApiClient =
            serde_json::from_value(json!({"role": "Hybrid", "documentName": "Test"})).unwrap();
        assert!(Uuid::parse_str(&client.document_guid).is_ok());

        let kept: ApiClient =
            serde_json::from_value(json!({"documentGuid": "fixed-guid"})).unwrap();
        assert_eq!(kept.document_guid, "fixed-guid");
    }

    #[test]
    fn test_owner_accepts_id_or_profile() {
        let by_id: ResourceBase = serde_json::from_value(json!({"owner": "u1"})).unwrap();
        assert_eq!(by_id.owner.as_ref().and_then(Owner::id), Some("u1"));

        let by_profile: ResourceBase =
            serde_json::from_value(json!({"owner": {"_id": "u2", "name": "Testy"}})).unwrap();
        assert_eq!(by_profile.owner.as_ref().and_then(Owner::id), Some("u2"));
    }

    #[test]
    fn test_comment_resource_info() {
        let comment: Comment = serde_json::from_value(json!({
            "text": "Wow this is an amazing resource!",
            "resource": {"resourceType": "stream", "resourceId": "s1"}
        }))
        .unwrap();
        let info = comment.resource.unwrap();
        assert_eq!(info.resource_type, "stream");
        assert_eq!(info.resource_id, "s1");
    }

    #[test]
    fn test_object_keeps_unmodelled_fields() {
        let object: SpeckleObject = serde_json::from_value(json!({
            "_id": "o1",
            "type": "Custom/Beam",
            "properties": {"level": 3},
            "span": 12.5
        }))
        .unwrap();
        assert_eq!(object.fields.base.id.as_deref(), Some("o1"));
        assert_eq!(object.fields.properties["level"], 3);
        assert_eq!(object.extra.len(), 1);
        assert_eq!(object.extra["span"], 12.5);

        let out = serde_json::to_value(&object).unwrap();
        assert_eq!(out["span"], 12.5);
        assert_eq!(out["type"], "Custom/Beam");
    }
}
