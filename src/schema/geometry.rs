//! Geometry object schemas
//!
//! Objects stored on a Speckle server carry a `type` tag such as `"Mesh"` or
//! `"Curve/Polyline"`. Each schema here is registered in the
//! [`SchemaRegistry`](super::SchemaRegistry) under its lowercase tag.

use super::records::{ObjectFields, ResourceBase};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

macro_rules! default_fn {
    ($name:ident, $ty:ty, $value:expr) => {
        fn $name() -> $ty {
            $value
        }
    };
}

default_fn!(point_type, String, "Point".to_string());
default_fn!(origin_value, Vec<f64>, vec![0.0, 0.0, 0.0]);
default_fn!(vector_type, String, "Vector".to_string());
default_fn!(vector_name, Option<String>, Some("SpeckleVector".to_string()));
default_fn!(z_axis_value, Vec<f64>, vec![0.0, 0.0, 1.0]);
default_fn!(interval_type, String, "Interval".to_string());
default_fn!(interval_name, Option<String>, Some("SpeckleInterval".to_string()));
default_fn!(line_type, Option<String>, Some("Line".to_string()));
default_fn!(line_name, Option<String>, Some("SpeckleLine".to_string()));
default_fn!(plane_type, Option<String>, Some("Plane".to_string()));
default_fn!(plane_name, Option<String>, Some("SpecklePlane".to_string()));
default_fn!(arc_type, Option<String>, Some("Arc".to_string()));
default_fn!(arc_name, Option<String>, Some("SpeckleArc".to_string()));
default_fn!(polyline_type, String, "Polyline".to_string());
default_fn!(polyline_name, Option<String>, Some("SpecklePolyline".to_string()));
default_fn!(polycurve_type, Option<String>, Some("Polycurve".to_string()));
default_fn!(polycurve_name, Option<String>, Some("SpecklePolycurve".to_string()));
default_fn!(curve_type, Option<String>, Some("Curve".to_string()));
default_fn!(mesh_type, Option<String>, Some("Mesh".to_string()));
default_fn!(mesh_name, Option<String>, Some("SpeckleMesh".to_string()));
default_fn!(brep_type, Option<String>, Some("Brep".to_string()));
default_fn!(brep_name, Option<String>, Some("SpeckleBrep".to_string()));
default_fn!(number_type, String, "Number".to_string());
default_fn!(number_name, Option<String>, Some("SpeckleNumber".to_string()));
default_fn!(text_type, String, "String".to_string());
default_fn!(text_name, Option<String>, Some("SpeckleString".to_string()));
default_fn!(yes, bool, true);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(flatten)]
    pub base: ResourceBase,
    #[serde(rename = "type", default = "point_type")]
    pub kind: String,
    #[serde(rename = "Value", default = "origin_value")]
    pub value: Vec<f64>,
}

impl Point {
    pub fn new(value: Vec<f64>) -> Self {
        Self {
            base: ResourceBase::default(),
            kind: point_type(),
            value,
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(origin_value())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default = "vector_type")]
    pub kind: String,
    #[serde(default = "vector_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Value", default = "z_axis_value")]
    pub value: Vec<f64>,
}

impl Vector {
    pub fn new(value: Vec<f64>) -> Self {
        Self {
            fields: ObjectFields::default(),
            kind: vector_type(),
            name: vector_name(),
            value,
        }
    }
}

impl Default for Vector {
    fn default() -> Self {
        Self::new(z_axis_value())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    #[serde(flatten)]
    pub base: ResourceBase,
    #[serde(rename = "type", default = "interval_type")]
    pub kind: String,
    #[serde(default = "interval_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Start", default)]
    pub start: f64,
    #[serde(rename = "End", default)]
    pub end: f64,
}

impl Default for Interval {
    fn default() -> Self {
        Self {
            base: ResourceBase::default(),
            kind: interval_type(),
            name: interval_name(),
            start: 0.0,
            end: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default = "line_type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default = "line_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Value", default)]
    pub value: Vec<f64>,
    #[serde(default)]
    pub domain: Interval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default = "plane_type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default = "plane_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub origin: Point,
    #[serde(default)]
    pub normal: Vector,
    #[serde(default = "x_axis")]
    pub xdir: Vector,
    #[serde(default = "y_axis")]
    pub ydir: Vector,
}

fn x_axis() -> Vector {
    Vector::new(vec![1.0, 0.0, 0.0])
}

fn y_axis() -> Vector {
    Vector::new(vec![0.0, 1.0, 0.0])
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            fields: ObjectFields::default(),
            kind: plane_type(),
            name: plane_name(),
            origin: Point::default(),
            normal: Vector::default(),
            xdir: x_axis(),
            ydir: y_axis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default = "arc_type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default = "arc_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Radius", default)]
    pub radius: f64,
    #[serde(rename = "StartAngle", default)]
    pub start_angle: f64,
    #[serde(rename = "EndAngle", default)]
    pub end_angle: f64,
    #[serde(rename = "AngleRadians", default)]
    pub angle_radians: f64,
    #[serde(rename = "Domain", default)]
    pub domain: Interval,
    #[serde(rename = "Plane", default)]
    pub plane: Plane,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default = "polyline_type")]
    pub kind: String,
    #[serde(default = "polyline_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polycurve {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default = "polycurve_type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default = "polycurve_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Segments", default)]
    pub segments: Vec<Map<String, Value>>,
    #[serde(rename = "Domain", default)]
    pub domain: Interval,
    #[serde(rename = "Closed", default)]
    pub closed: bool,
}

/// NURBS curve; `name` defaults to `SpecklePolycurve` on the server side too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curve {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default = "curve_type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default = "polycurve_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub segments: Vec<Map<String, Value>>,
    #[serde(default)]
    pub domain: Interval,
    #[serde(default)]
    pub degree: i64,
    #[serde(default = "yes")]
    pub rational: bool,
    #[serde(default = "yes")]
    pub periodic: bool,
    #[serde(default)]
    pub points: Vec<f64>,
    #[serde(default)]
    pub weights: Vec<f64>,
    #[serde(default)]
    pub knots: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<Polyline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default = "mesh_type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default = "mesh_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub vertices: Vec<f64>,
    #[serde(default)]
    pub faces: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_coordinates: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brep {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default = "brep_type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default = "brep_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<Mesh>,
    #[serde(default)]
    pub raw_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Number {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default = "number_type")]
    pub kind: String,
    #[serde(default = "number_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub value: f64,
}

/// A string value object (`type: "String"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default = "text_type")]
    pub kind: String,
    #[serde(default = "text_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub value: String,
}

/// Placeholder object with no geometry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Null {
    #[serde(flatten)]
    pub fields: ObjectFields,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_point_defaults_to_origin() {
        let point: Point = serde_json::from_value(json!({})).unwrap();
        assert_eq!(point.kind, "Point");
        assert_eq!(point.value, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_plane_axes_default() {
        let plane: Plane = serde_json::from_value(json!({"type": "Plane"})).unwrap();
        assert_eq!(plane.normal.value, vec![0.0, 0.0, 1.0]);
        assert_eq!(plane.xdir.value, vec![1.0, 0.0, 0.0]);
        assert_eq!(plane.ydir.value, vec![0.0, 1.0, 0.0]);
        assert_eq!(plane.name.as_deref(), Some("SpecklePlane"));
    }

    #[test]
    fn test_mesh_keeps_object_fields() {
        let mesh: Mesh = serde_json::from_value(json!({
            "_id": "m1",
            "type": "Mesh",
            "vertices": [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            "faces": [0, 0, 1, 2],
            "properties": {"layer": "walls"}
        }))
        .unwrap();
        assert_eq!(mesh.fields.base.id.as_deref(), Some("m1"));
        assert_eq!(mesh.vertices.len(), 9);
        assert_eq!(mesh.fields.properties["layer"], "walls");
    }

    #[test]
    fn test_brep_nests_display_mesh() {
        let brep: Brep = serde_json::from_value(json!({
            "type": "Brep",
            "rawData": "opaque",
            "displayValue": {"vertices": [1.0, 2.0, 3.0], "faces": []}
        }))
        .unwrap();
        assert_eq!(brep.raw_data, "opaque");
        assert_eq!(brep.display_value.unwrap().vertices, vec![1.0, 2.0, 3.0]);
    }
}
