//! Resource Dispatch
//!
//! A [`Resource`] is bound to one REST sub-path and turns verb calls into
//! HTTP requests: it checks the verb against the resource's allow-list,
//! builds the URL, normalizes the outgoing payload through the resource's
//! schema, sends it, opens the response envelope and decodes the payload
//! into typed records.

use super::envelope::{self, Payload};
use super::query::Query;
use super::registry::ResourceDescriptor;
use super::verb::Verb;
use crate::api::http::SpeckleHttpClient;
use crate::api::session::{Principal, Session};
use crate::error::{Error, Result};
use crate::schema::{Record, SchemaKind, SchemaRegistry};
use serde_json::Value;
use std::sync::Arc;

/// Per-call knobs for [`Resource::request`]
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Target the comment sub-resource (`comments/<name>`) and use the comment schema
    pub comment: bool,
    /// Decode every returned object with this schema, skipping type-tag resolution
    pub schema: Option<SchemaKind>,
    /// Replaces the resource's default schema as the last typed fallback
    pub fallback: Option<SchemaKind>,
    pub query: Option<Query>,
    /// Send the payload exactly as given, without schema normalization
    pub raw_body: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(mut self) -> Self {
        self.comment = true;
        self
    }

    pub fn schema(mut self, schema: SchemaKind) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn fallback(mut self, schema: SchemaKind) -> Self {
        self.fallback = Some(schema);
        self
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    pub fn raw_body(mut self) -> Self {
        self.raw_body = true;
        self
    }
}

/// Decoded result of a resource call
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// The envelope carried `resource`
    One(Record),
    /// The envelope carried `resources`; server order is preserved
    Many(Vec<Record>),
    /// Any other successful envelope, unchanged
    Payload(Value),
}

impl Response {
    pub fn into_one(self) -> Result<Record> {
        match self {
            Self::One(record) => Ok(record),
            Self::Many(_) => Err(Error::Decode("expected one resource, got a list".to_string())),
            Self::Payload(_) => Err(Error::Decode("expected one resource, got a bare payload".to_string())),
        }
    }

    pub fn into_many(self) -> Result<Vec<Record>> {
        match self {
            Self::Many(records) => Ok(records),
            Self::One(_) => Err(Error::Decode("expected a list, got one resource".to_string())),
            Self::Payload(_) => Err(Error::Decode("expected a list, got a bare payload".to_string())),
        }
    }

    /// Single record converted to a concrete type
    pub fn one<T>(self) -> Result<T>
    where
        T: TryFrom<Record, Error = Error>,
    {
        T::try_from(self.into_one()?)
    }

    /// List of records converted to a concrete type
    pub fn many<T>(self) -> Result<Vec<T>>
    where
        T: TryFrom<Record, Error = Error>,
    {
        self.into_many()?.into_iter().map(T::try_from).collect()
    }

    /// Bare envelope payload (confirmation messages and the like)
    pub fn into_payload(self) -> Result<Value> {
        match self {
            Self::Payload(value) => Ok(value),
            Self::One(record) => record.to_value(),
            Self::Many(records) => Ok(Value::Array(
                records
                    .iter()
                    .map(Record::to_value)
                    .collect::<Result<Vec<_>>>()?,
            )),
        }
    }
}

/// Percent-encode one path segment
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Generic dispatcher bound to one REST resource
#[derive(Clone)]
pub struct Resource {
    http: SpeckleHttpClient,
    session: Session,
    schemas: Arc<SchemaRegistry>,
    descriptor: &'static ResourceDescriptor,
}

impl Resource {
    pub fn new(
        http: SpeckleHttpClient,
        session: Session,
        schemas: Arc<SchemaRegistry>,
        descriptor: &'static ResourceDescriptor,
    ) -> Self {
        Self {
            http,
            session,
            schemas,
            descriptor,
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    /// Principal snapshot taken when this handle was created
    pub fn me(&self) -> Option<&Principal> {
        self.session.me.as_ref()
    }

    /// URL for `subpath` under this resource (or its comment sub-resource)
    pub fn url(&self, subpath: &str, comment: bool, query: Option<&Query>) -> String {
        let base = if comment {
            self.session.url(&format!("comments/{}", self.descriptor.name))
        } else {
            self.session.url(self.descriptor.name)
        };
        let query = query.map(Query::to_query_string).unwrap_or_default();
        format!("{}{}{}", base, subpath, query)
    }

    /// Dispatch one verb call.
    ///
    /// The verb is checked against the resource's allow-list before anything
    /// is built or sent.
    pub async fn request(
        &self,
        verb: Verb,
        subpath: &str,
        data: Option<Value>,
        mut options: RequestOptions,
    ) -> Result<Response> {
        if !self.descriptor.supports(verb) {
            return Err(Error::UnsupportedOperation {
                resource: self.descriptor.name.to_string(),
                verb: verb.to_string(),
            });
        }
        options.comment |= verb.is_comment();

        let url = self.url(subpath, options.comment, options.query.as_ref());
        let body = match data {
            Some(data) => Some(self.prepare_body(data, &options)?),
            None => None,
        };

        let response = self
            .http
            .send(verb.method(), &url, self.session.token.as_deref(), body.as_ref())
            .await?;

        match envelope::open(response.body, response.status)? {
            Payload::Many(items) => items
                .into_iter()
                .map(|item| self.decode(item, &options))
                .collect::<Result<Vec<_>>>()
                .map(Response::Many),
            Payload::One(item) => self.decode(item, &options).map(Response::One),
            Payload::Other(body) => Ok(Response::Payload(body)),
        }
    }

    /// Normalize an outgoing payload. Lists normalize element-wise; string
    /// elements (ids) pass through. Resources without a schema send data
    /// unchanged.
    fn prepare_body(&self, data: Value, options: &RequestOptions) -> Result<Value> {
        if options.raw_body {
            return Ok(data);
        }

        let default = if options.comment {
            Some(SchemaKind::Comment)
        } else {
            self.descriptor.schema
        };
        let Some(default) = default else {
            return Ok(data);
        };

        match data {
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.normalize_item(item, default, options.comment))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => self.normalize_item(other, default, options.comment),
        }
    }

    /// Objects carrying a known `type` tag normalize through that schema,
    /// the rest through `default`
    fn normalize_item(&self, item: Value, default: SchemaKind, comment: bool) -> Result<Value> {
        if !item.is_object() {
            return Ok(item);
        }

        let schema = if comment {
            default
        } else {
            item.get("type")
                .and_then(Value::as_str)
                .and_then(|tag| self.schemas.resolve(tag))
                .unwrap_or(default)
        };
        schema.normalize(item)
    }

    /// Pick a schema for one returned object and decode it:
    /// explicit schema, then comment schema, then the `type` tag, then the
    /// fallback/default schema, else the raw value.
    fn decode(&self, item: Value, options: &RequestOptions) -> Result<Record> {
        if !item.is_object() {
            return Ok(Record::Raw(item));
        }

        let schema = options
            .schema
            .or_else(|| options.comment.then_some(SchemaKind::Comment))
            .or_else(|| {
                item.get("type")
                    .and_then(Value::as_str)
                    .and_then(|tag| self.schemas.resolve(tag))
            })
            .or(options.fallback)
            .or(self.descriptor.schema);

        match schema {
            Some(schema) => schema.decode(item),
            None => Ok(Record::Raw(item)),
        }
    }

    // =========================================================================
    // Common verbs
    // =========================================================================

    pub async fn list(&self) -> Result<Response> {
        self.request(Verb::List, "/", None, RequestOptions::new()).await
    }

    pub async fn list_with(&self, query: Query) -> Result<Response> {
        self.request(Verb::List, "/", None, RequestOptions::new().query(query))
            .await
    }

    pub async fn create(&self, data: Value) -> Result<Response> {
        self.request(Verb::Create, "/", Some(data), RequestOptions::new())
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Response> {
        self.request(Verb::Get, &format!("/{}", segment(id)), None, RequestOptions::new())
            .await
    }

    pub async fn get_with(&self, id: &str, query: Query) -> Result<Response> {
        self.request(
            Verb::Get,
            &format!("/{}", segment(id)),
            None,
            RequestOptions::new().query(query),
        )
        .await
    }

    pub async fn update(&self, id: &str, data: Value) -> Result<Response> {
        self.request(
            Verb::Update,
            &format!("/{}", segment(id)),
            Some(data),
            RequestOptions::new(),
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<Response> {
        self.request(Verb::Delete, &format!("/{}", segment(id)), None, RequestOptions::new())
            .await
    }

    /// Comments attached to the resource `id`
    pub async fn comment_get(&self, id: &str) -> Result<Response> {
        self.request(
            Verb::CommentGet,
            &format!("/{}", segment(id)),
            None,
            RequestOptions::new().comment(),
        )
        .await
    }

    /// Attach a comment to the resource `id`
    pub async fn comment_create(&self, id: &str, data: Value) -> Result<Response> {
        self.request(
            Verb::CommentCreate,
            &format!("/{}", segment(id)),
            Some(data),
            RequestOptions::new().comment(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::registry::ResourceKind;
    use serde_json::json;

    fn resource(kind: ResourceKind) -> Resource {
        Resource::new(
            SpeckleHttpClient::new(None).unwrap(),
            Session::new("http://localhost:3000/api/v1"),
            Arc::new(SchemaRegistry::builtin()),
            kind.descriptor(),
        )
    }

    #[test]
    fn test_url_shapes() {
        let streams = resource(ResourceKind::Streams);
        assert_eq!(
            streams.url("/abc", false, None),
            "http://localhost:3000/api/v1/streams/abc"
        );
        assert_eq!(
            streams.url("/abc", true, None),
            "http://localhost:3000/api/v1/comments/streams/abc"
        );
        let query = Query::new().with("omit", "objects");
        assert_eq!(
            streams.url("/", false, Some(&query)),
            "http://localhost:3000/api/v1/streams/?omit=objects"
        );
    }

    #[test]
    fn test_decode_policy_order() {
        let objects = resource(ResourceKind::Objects);

        let item = json!({"type": "Mesh", "vertices": [1.0]});
        let record = objects.decode(item.clone(), &RequestOptions::new()).unwrap();
        assert_eq!(record.kind(), Some(SchemaKind::Mesh));

        let record = objects
            .decode(item.clone(), &RequestOptions::new().schema(SchemaKind::Null))
            .unwrap();
        assert_eq!(record.kind(), Some(SchemaKind::Null));

        let record = objects
            .decode(json!({"text": "hi", "type": "Mesh"}), &RequestOptions::new().comment())
            .unwrap();
        assert_eq!(record.kind(), Some(SchemaKind::Comment));

        let record = objects
            .decode(json!({"type": "Placeholder"}), &RequestOptions::new())
            .unwrap();
        assert_eq!(record.kind(), Some(SchemaKind::Object));
    }

    #[test]
    fn test_decode_without_schema_is_raw() {
        let accounts = resource(ResourceKind::Accounts);
        let item = json!({"name": "Testy", "company": "Test Inc"});
        let record = accounts.decode(item.clone(), &RequestOptions::new()).unwrap();
        assert_eq!(record, Record::Raw(item));
    }

    #[test]
    fn test_prepare_body_normalizes_lists() {
        let objects = resource(ResourceKind::Objects);
        let body = objects
            .prepare_body(json!([{"name": "o1", "parent": null}, "5ce0e7d1"]), &RequestOptions::new())
            .unwrap();
        assert_eq!(body, json!([{"name": "o1"}, "5ce0e7d1"]));
    }

    #[test]
    fn test_prepare_body_uses_type_tag_schema() {
        let objects = resource(ResourceKind::Objects);
        let body = objects
            .prepare_body(
                json!({"type": "Mesh", "vertices": [1.0, 2.0, 3.0], "faces": [0, 1, 2]}),
                &RequestOptions::new(),
            )
            .unwrap();
        assert_eq!(body["type"], "Mesh");
        assert_eq!(body["vertices"], json!([1.0, 2.0, 3.0]));
        assert_eq!(body["faces"], json!([0, 1, 2]));
    }

    #[test]
    fn test_prepare_body_keeps_unknown_object_fields() {
        let objects = resource(ResourceKind::Objects);
        let body = objects
            .prepare_body(
                json!({"type": "Custom/Beam", "span": 12.5, "material": {"grade": "S355"}}),
                &RequestOptions::new(),
            )
            .unwrap();
        assert_eq!(
            body,
            json!({"type": "Custom/Beam", "span": 12.5, "material": {"grade": "S355"}})
        );
    }

    #[test]
    fn test_prepare_body_raw_skips_normalization() {
        let objects = resource(ResourceKind::Objects);
        let data = json!({"color": "red", "level": 3, "note": null});
        let body = objects
            .prepare_body(data.clone(), &RequestOptions::new().raw_body())
            .unwrap();
        assert_eq!(body, data);
    }

    #[test]
    fn test_prepare_body_passes_through_without_schema() {
        let accounts = resource(ResourceKind::Accounts);
        let data = json!({"name": null, "role": "admin"});
        assert_eq!(
            accounts.prepare_body(data.clone(), &RequestOptions::new()).unwrap(),
            data
        );
    }

    #[tokio::test]
    async fn test_unsupported_verb_fails_before_io() {
        // Nothing listens on this address; an attempted request would be a transport error
        let accounts = resource(ResourceKind::Accounts);
        let err = accounts.list().await.unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedOperation { ref resource, ref verb } if resource == "accounts" && verb == "list"
        ));
    }
}
