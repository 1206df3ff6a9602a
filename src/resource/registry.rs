//! Resource Registry - static resource descriptors
//!
//! Every REST resource the client knows about, with the verbs it accepts
//! and the schema its single-object responses decode into. The set is
//! closed: lookups by name go through [`ResourceKind::from_name`] and fail
//! with `UnknownResource` for anything else.

use super::verb::Verb;
use crate::error::{Error, Result};
use crate::schema::SchemaKind;
use std::fmt;
use std::str::FromStr;

/// Static description of one REST resource
#[derive(Debug)]
pub struct ResourceDescriptor {
    /// URL segment under the API root
    pub name: &'static str,
    /// Verbs this resource accepts, in declaration order
    pub verbs: &'static [Verb],
    /// Schema used when neither the call nor the `type` tag picks one
    pub schema: Option<SchemaKind>,
}

impl ResourceDescriptor {
    pub fn supports(&self, verb: Verb) -> bool {
        self.verbs.contains(&verb)
    }
}

/// Known resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Accounts,
    ApiClients,
    Comments,
    Objects,
    Projects,
    Streams,
}

static ACCOUNTS: ResourceDescriptor = ResourceDescriptor {
    name: "accounts",
    verbs: &[
        Verb::Get,
        Verb::Delete,
        Verb::GetProfile,
        Verb::UpdateProfile,
        Verb::SetRole,
        Verb::Search,
    ],
    schema: None,
};

static API_CLIENTS: ResourceDescriptor = ResourceDescriptor {
    name: "clients",
    verbs: &[Verb::List, Verb::Create, Verb::Get, Verb::Update, Verb::Delete],
    schema: Some(SchemaKind::ApiClient),
};

static COMMENTS: ResourceDescriptor = ResourceDescriptor {
    name: "comments",
    verbs: &[
        Verb::List,
        Verb::Create,
        Verb::Get,
        Verb::Update,
        Verb::Delete,
        Verb::CommentGet,
        Verb::CommentCreate,
        Verb::Assigned,
    ],
    schema: Some(SchemaKind::Comment),
};

static OBJECTS: ResourceDescriptor = ResourceDescriptor {
    name: "objects",
    verbs: &[
        Verb::List,
        Verb::Create,
        Verb::Get,
        Verb::Update,
        Verb::Delete,
        Verb::CommentGet,
        Verb::CommentCreate,
        Verb::GetBulk,
        Verb::SetProperties,
    ],
    schema: Some(SchemaKind::Object),
};

static PROJECTS: ResourceDescriptor = ResourceDescriptor {
    name: "projects",
    verbs: &[
        Verb::List,
        Verb::Create,
        Verb::Get,
        Verb::Update,
        Verb::Delete,
        Verb::CommentGet,
        Verb::CommentCreate,
        Verb::AddStream,
        Verb::AddUser,
        Verb::RemoveUser,
        Verb::RemoveStream,
        Verb::UpgradeUser,
        Verb::DowngradeUser,
    ],
    schema: Some(SchemaKind::Project),
};

static STREAMS: ResourceDescriptor = ResourceDescriptor {
    name: "streams",
    verbs: &[
        Verb::List,
        Verb::Create,
        Verb::Get,
        Verb::Update,
        Verb::Delete,
        Verb::CommentGet,
        Verb::CommentCreate,
        Verb::Clone,
        Verb::Diff,
        Verb::ListObjects,
        Verb::ListClients,
    ],
    schema: Some(SchemaKind::Stream),
};

impl ResourceKind {
    pub const ALL: &'static [ResourceKind] = &[
        ResourceKind::Accounts,
        ResourceKind::ApiClients,
        ResourceKind::Comments,
        ResourceKind::Objects,
        ResourceKind::Projects,
        ResourceKind::Streams,
    ];

    pub fn descriptor(self) -> &'static ResourceDescriptor {
        match self {
            Self::Accounts => &ACCOUNTS,
            Self::ApiClients => &API_CLIENTS,
            Self::Comments => &COMMENTS,
            Self::Objects => &OBJECTS,
            Self::Projects => &PROJECTS,
            Self::Streams => &STREAMS,
        }
    }

    /// Resolve a resource by accessor name (`api_clients`) or URL segment (`clients`)
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "accounts" => Ok(Self::Accounts),
            "api_clients" | "clients" => Ok(Self::ApiClients),
            "comments" => Ok(Self::Comments),
            "objects" => Ok(Self::Objects),
            "projects" => Ok(Self::Projects),
            "streams" => Ok(Self::Streams),
            _ => Err(Error::UnknownResource(name.to_string())),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().name)
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}
