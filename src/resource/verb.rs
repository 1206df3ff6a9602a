//! Verb table
//!
//! Every logical operation a resource can expose, and the HTTP method it is
//! sent with. The table is fixed; resources pick a subset through their
//! descriptor.

use reqwest::Method;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    List,
    Create,
    Get,
    Update,
    Delete,
    CommentGet,
    CommentCreate,
    // streams
    Clone,
    Diff,
    ListObjects,
    ListClients,
    // projects
    AddStream,
    RemoveStream,
    AddUser,
    RemoveUser,
    UpgradeUser,
    DowngradeUser,
    // objects
    GetBulk,
    SetProperties,
    // accounts
    GetProfile,
    UpdateProfile,
    SetRole,
    Search,
    // comments
    Assigned,
}

impl Verb {
    pub const ALL: &'static [Verb] = &[
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
        Verb::AddStream,
        Verb::RemoveStream,
        Verb::AddUser,
        Verb::RemoveUser,
        Verb::UpgradeUser,
        Verb::DowngradeUser,
        Verb::GetBulk,
        Verb::SetProperties,
        Verb::GetProfile,
        Verb::UpdateProfile,
        Verb::SetRole,
        Verb::Search,
        Verb::Assigned,
    ];

    /// HTTP method this verb is sent with
    pub fn method(self) -> Method {
        match self {
            Self::List
            | Self::Get
            | Self::CommentGet
            | Self::Diff
            | Self::ListObjects
            | Self::ListClients
            | Self::GetProfile
            | Self::Assigned => Method::GET,
            Self::Create | Self::CommentCreate | Self::Clone | Self::GetBulk | Self::Search => {
                Method::POST
            },
            Self::Update
            | Self::AddStream
            | Self::AddUser
            | Self::UpgradeUser
            | Self::DowngradeUser
            | Self::SetProperties
            | Self::UpdateProfile
            | Self::SetRole => Method::PUT,
            Self::Delete | Self::RemoveStream | Self::RemoveUser => Method::DELETE,
        }
    }

    /// Whether the request targets the comment sub-resource
    pub fn is_comment(self) -> bool {
        matches!(self, Self::CommentGet | Self::CommentCreate)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Get => "get",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::CommentGet => "comment_get",
            Self::CommentCreate => "comment_create",
            Self::Clone => "clone",
            Self::Diff => "diff",
            Self::ListObjects => "list_objects",
            Self::ListClients => "list_clients",
            Self::AddStream => "add_stream",
            Self::RemoveStream => "remove_stream",
            Self::AddUser => "add_user",
            Self::RemoveUser => "remove_user",
            Self::UpgradeUser => "upgrade_user",
            Self::DowngradeUser => "downgrade_user",
            Self::GetBulk => "get_bulk",
            Self::SetProperties => "set_properties",
            Self::GetProfile => "get_profile",
            Self::UpdateProfile => "update_profile",
            Self::SetRole => "set_role",
            Self::Search => "search",
            Self::Assigned => "assigned",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|verb| verb.as_str() == s)
            .ok_or_else(|| format!("unknown verb: {}", s))
    }
}
