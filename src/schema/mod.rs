//! Schemas and typed records
//!
//! A [`SchemaKind`] names one record shape. It knows how to decode a JSON
//! payload into a [`Record`] and how to normalize an outgoing payload by
//! round-tripping it through the typed shape.
//!
//! # Module Structure
//!
//! - [`records`] - REST resource records (streams, projects, objects, ...)
//! - [`geometry`] - geometry object schemas resolved by `type` tag
//! - [`registry`] - type-tag to schema lookup
//! - [`normalize`] - empty-field stripping for outgoing payloads

pub mod geometry;
pub mod normalize;
pub mod records;
mod registry;

pub use normalize::strip_empty;
pub use registry::SchemaRegistry;

use crate::error::{Error, Result};
use serde_json::Value;

macro_rules! schemas {
    ($($kind:ident => $ty:ty, $tag:literal;)+) => {
        /// Every record shape the client can decode into
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SchemaKind {
            $($kind,)+
        }

        impl SchemaKind {
            pub const ALL: &'static [SchemaKind] = &[$(SchemaKind::$kind,)+];

            /// Lowercase tag this schema is known by
            pub fn tag(self) -> &'static str {
                match self {
                    $(Self::$kind => $tag,)+
                }
            }

            /// Decode a JSON payload into a typed record
            pub fn decode(self, value: Value) -> Result<Record> {
                match self {
                    $(Self::$kind => serde_json::from_value::<$ty>(value)
                        .map(Record::$kind)
                        .map_err(|e| Error::Decode(format!("{} payload: {}", $tag, e))),)+
                }
            }
        }

        /// A decoded server payload
        #[derive(Debug, Clone, PartialEq)]
        pub enum Record {
            $($kind($ty),)+
            /// Payload with no applicable schema, returned unchanged
            Raw(Value),
        }

        impl Record {
            /// The schema this record was decoded with, `None` for raw payloads
            pub fn kind(&self) -> Option<SchemaKind> {
                match self {
                    $(Self::$kind(_) => Some(SchemaKind::$kind),)+
                    Self::Raw(_) => None,
                }
            }

            /// Serialize back to the wire representation
            pub fn to_value(&self) -> Result<Value> {
                match self {
                    $(Self::$kind(record) => Ok(serde_json::to_value(record)?),)+
                    Self::Raw(value) => Ok(value.clone()),
                }
            }
        }

        $(
            impl TryFrom<Record> for $ty {
                type Error = Error;

                fn try_from(record: Record) -> Result<Self> {
                    match record {
                        Record::$kind(inner) => Ok(inner),
                        other => Err(Error::Decode(format!(
                            "expected {} record, got {:?}",
                            $tag,
                            other.kind().map(SchemaKind::tag).unwrap_or("raw")
                        ))),
                    }
                }
            }
        )+
    };
}

schemas! {
    Stream => records::Stream, "stream";
    Project => records::Project, "project";
    Object => records::SpeckleObject, "object";
    ApiClient => records::ApiClient, "client";
    Comment => records::Comment, "comment";
    User => records::User, "user";
    Point => geometry::Point, "point";
    Vector => geometry::Vector, "vector";
    Interval => geometry::Interval, "interval";
    Line => geometry::Line, "line";
    Plane => geometry::Plane, "plane";
    Arc => geometry::Arc, "arc";
    Polyline => geometry::Polyline, "polyline";
    Polycurve => geometry::Polycurve, "polycurve";
    Curve => geometry::Curve, "curve";
    Mesh => geometry::Mesh, "mesh";
    Brep => geometry::Brep, "brep";
    Number => geometry::Number, "number";
    Text => geometry::Text, "string";
    Null => geometry::Null, "null";
}

impl SchemaKind {
    /// Schemas selected by an object's `type` tag rather than by the resource
    pub const GEOMETRY: &'static [SchemaKind] = &[
        SchemaKind::Point,
        SchemaKind::Vector,
        SchemaKind::Interval,
        SchemaKind::Line,
        SchemaKind::Plane,
        SchemaKind::Arc,
        SchemaKind::Polyline,
        SchemaKind::Polycurve,
        SchemaKind::Curve,
        SchemaKind::Mesh,
        SchemaKind::Brep,
        SchemaKind::Number,
        SchemaKind::Text,
        SchemaKind::Null,
    ];

    /// Build an instance of this schema from `data` and serialize it back,
    /// dropping anything left empty or null.
    pub fn normalize(self, data: Value) -> Result<Value> {
        let record = self.decode(data)?;
        Ok(strip_empty(record.to_value()?))
    }
}

impl Record {
    /// Server id of the record, if it has one
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Stream(r) => r.base.id.as_deref(),
            Self::Project(r) => r.base.id.as_deref(),
            Self::Object(r) => r.fields.base.id.as_deref(),
            Self::ApiClient(r) => r.base.id.as_deref(),
            Self::Comment(r) => r.id.as_deref(),
            Self::User(r) => r.id.as_deref(),
            Self::Point(r) => r.base.id.as_deref(),
            Self::Interval(r) => r.base.id.as_deref(),
            Self::Vector(r) => r.fields.base.id.as_deref(),
            Self::Line(r) => r.fields.base.id.as_deref(),
            Self::Plane(r) => r.fields.base.id.as_deref(),
            Self::Arc(r) => r.fields.base.id.as_deref(),
            Self::Polyline(r) => r.fields.base.id.as_deref(),
            Self::Polycurve(r) => r.fields.base.id.as_deref(),
            Self::Curve(r) => r.fields.base.id.as_deref(),
            Self::Mesh(r) => r.fields.base.id.as_deref(),
            Self::Brep(r) => r.fields.base.id.as_deref(),
            Self::Number(r) => r.fields.base.id.as_deref(),
            Self::Text(r) => r.fields.base.id.as_deref(),
            Self::Null(r) => r.fields.base.id.as_deref(),
            Self::Raw(value) => value
                .get("_id")
                .or_else(|| value.get("id"))
                .and_then(|v| v.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tags_are_lowercase_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for kind in SchemaKind::ALL {
            let tag = kind.tag();
            assert_eq!(tag, tag.to_lowercase());
            assert!(seen.insert(tag), "duplicate tag {}", tag);
        }
    }

    #[test]
    fn test_normalize_drops_empty_fields() {
        let normalized = SchemaKind::Project
            .normalize(json!({"name": "p1", "description": null, "unknown": 1}))
            .unwrap();
        assert_eq!(normalized, json!({"name": "p1"}));
    }

    #[test]
    fn test_normalize_rejects_wrong_shape() {
        let err = SchemaKind::Project.normalize(json!({"name": 42})).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_round_trip_through_schema() {
        let original = json!({
            "_id": "p1",
            "name": "test project",
            "description": "a project made for testing purposes",
            "tags": ["a"],
            "streams": ["s1", "s2"],
            "permissions": {"canRead": ["u1"]}
        });
        let record = SchemaKind::Project.decode(original).unwrap();
        let encoded = strip_empty(record.to_value().unwrap());
        let decoded = SchemaKind::Project.decode(encoded).unwrap();
        assert_eq!(record, decoded);
        assert_eq!(decoded.id(), Some("p1"));
    }

    #[test]
    fn test_try_from_record() {
        let record = SchemaKind::Stream.decode(json!({"name": "s"})).unwrap();
        let stream = records::Stream::try_from(record.clone()).unwrap();
        assert_eq!(stream.name.as_deref(), Some("s"));
        assert!(records::Project::try_from(record).is_err());
    }
}
