//! Typed resource handles
//!
//! Thin wrappers over [`Resource`] adding the verbs specific to one
//! resource. The common verbs (`list`, `get`, `create`, ...) are reached
//! through `Deref`; calling one the resource does not accept fails with
//! `UnsupportedOperation` before any request is sent.

use super::dispatch::{segment, RequestOptions, Resource, Response};
use super::query::Query;
use super::verb::Verb;
use crate::error::Result;
use crate::schema::SchemaKind;
use serde_json::Value;
use std::ops::Deref;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            inner: Resource,
        }

        impl $name {
            pub(crate) fn new(inner: Resource) -> Self {
                Self { inner }
            }
        }

        impl Deref for $name {
            type Target = Resource;

            fn deref(&self) -> &Resource {
                &self.inner
            }
        }
    };
}

handle!(
    /// `accounts`: profiles, roles and user search
    Accounts
);
handle!(
    /// `clients`: registered sender/receiver applications
    ApiClients
);
handle!(
    /// `comments`: comment threads
    Comments
);
handle!(
    /// `objects`: stored geometry and data objects
    Objects
);
handle!(
    /// `projects`: groups of streams with shared permissions
    Projects
);
handle!(
    /// `streams`: versioned collections of objects
    Streams
);

impl Accounts {
    /// Profile of the logged-in user
    pub async fn get_profile(&self) -> Result<Response> {
        self.request(Verb::GetProfile, "/", None, RequestOptions::new())
            .await
    }

    pub async fn update_profile(&self, data: Value) -> Result<Response> {
        self.request(Verb::UpdateProfile, "/", Some(data), RequestOptions::new())
            .await
    }

    /// Admin only: change the role of user `id`
    pub async fn set_role(&self, id: &str, data: Value) -> Result<Response> {
        self.request(
            Verb::SetRole,
            &format!("/{}", segment(id)),
            Some(data),
            RequestOptions::new(),
        )
        .await
    }

    /// Search users by name, surname or company
    pub async fn search(&self, data: Value) -> Result<Response> {
        self.request(
            Verb::Search,
            "/search",
            Some(data),
            RequestOptions::new().schema(SchemaKind::User),
        )
        .await
    }
}

impl Comments {
    /// Comments assigned to the logged-in user
    pub async fn assigned(&self) -> Result<Response> {
        self.request(Verb::Assigned, "/assigned", None, RequestOptions::new())
            .await
    }
}

impl Objects {
    /// Fetch many objects by id in one call
    pub async fn get_bulk(&self, ids: &[&str], query: Option<Query>) -> Result<Response> {
        let data = Value::Array(ids.iter().map(|id| Value::String(id.to_string())).collect());
        let mut options = RequestOptions::new();
        if let Some(query) = query {
            options = options.query(query);
        }
        self.request(Verb::GetBulk, "/getbulk", Some(data), options)
            .await
    }

    /// Replace the `properties` map of object `id`; `data` is sent as is
    pub async fn set_properties(&self, id: &str, data: Value) -> Result<Response> {
        self.request(
            Verb::SetProperties,
            &format!("/{}/properties", segment(id)),
            Some(data),
            RequestOptions::new().raw_body(),
        )
        .await
    }
}

impl Projects {
    async fn membership(&self, verb: Verb, id: &str, action: &str, other: &str) -> Result<Response> {
        self.request(
            verb,
            &format!("/{}/{}/{}", segment(id), action, segment(other)),
            None,
            RequestOptions::new(),
        )
        .await
    }

    pub async fn add_stream(&self, id: &str, stream_id: &str) -> Result<Response> {
        self.membership(Verb::AddStream, id, "addstream", stream_id)
            .await
    }

    pub async fn remove_stream(&self, id: &str, stream_id: &str) -> Result<Response> {
        self.membership(Verb::RemoveStream, id, "removestream", stream_id)
            .await
    }

    /// New members get read and write access
    pub async fn add_user(&self, id: &str, user_id: &str) -> Result<Response> {
        self.membership(Verb::AddUser, id, "adduser", user_id).await
    }

    /// Also revokes the user's access to the project's streams
    pub async fn remove_user(&self, id: &str, user_id: &str) -> Result<Response> {
        self.membership(Verb::RemoveUser, id, "removeuser", user_id)
            .await
    }

    pub async fn upgrade_user(&self, id: &str, user_id: &str) -> Result<Response> {
        self.membership(Verb::UpgradeUser, id, "upgradeuser", user_id)
            .await
    }

    pub async fn downgrade_user(&self, id: &str, user_id: &str) -> Result<Response> {
        self.membership(Verb::DowngradeUser, id, "downgradeuser", user_id)
            .await
    }
}

impl Streams {
    /// List streams without their object lists
    pub async fn list_summaries(&self) -> Result<Response> {
        self.list_with(Query::new().with("omit", "objects")).await
    }

    pub async fn clone_stream(&self, id: &str) -> Result<Response> {
        self.request(
            Verb::Clone,
            &format!("/{}/clone", segment(id)),
            None,
            RequestOptions::new(),
        )
        .await
    }

    pub async fn diff(&self, id: &str, other_id: &str) -> Result<Response> {
        self.request(
            Verb::Diff,
            &format!("/{}/diff/{}", segment(id), segment(other_id)),
            None,
            RequestOptions::new(),
        )
        .await
    }

    /// Objects of stream `id`, typed by their `type` tag where possible
    pub async fn list_objects(&self, id: &str, query: Option<Query>) -> Result<Response> {
        let mut options = RequestOptions::new().fallback(SchemaKind::Object);
        if let Some(query) = query {
            options = options.query(query);
        }
        self.request(
            Verb::ListObjects,
            &format!("/{}/objects", segment(id)),
            None,
            options,
        )
        .await
    }

    /// API clients attached to stream `id`
    pub async fn list_clients(&self, id: &str) -> Result<Response> {
        self.request(
            Verb::ListClients,
            &format!("/{}/clients", segment(id)),
            None,
            RequestOptions::new().schema(SchemaKind::ApiClient),
        )
        .await
    }
}
