//! Resource abstraction layer
//!
//! A single dispatcher drives every REST resource. Resources differ only in
//! their static [`ResourceDescriptor`]: URL segment, accepted verbs and
//! default schema.
//!
//! # Architecture
//!
//! - [`verb`] - verb to HTTP method table
//! - [`registry`] - static resource descriptors, keyed by [`ResourceKind`]
//! - [`query`] - query-string construction
//! - [`envelope`] - `{success, resource|resources|message}` handling
//! - [`dispatch`] - the generic [`Resource`] dispatcher
//! - [`handles`] - typed wrappers adding resource-specific verbs
//!
//! # Example
//!
//! ```ignore
//! use speckle::{SpeckleClient, Config};
//! use speckle::schema::records::Stream;
//!
//! async fn streams(client: &SpeckleClient) -> speckle::Result<Vec<Stream>> {
//!     client.streams().list().await?.many()
//! }
//! ```

pub mod dispatch;
pub mod envelope;
pub mod handles;
pub mod query;
mod registry;
pub mod verb;

pub use dispatch::{RequestOptions, Resource, Response};
pub use handles::{Accounts, ApiClients, Comments, Objects, Projects, Streams};
pub use query::{Query, QueryValue};
pub use registry::{ResourceDescriptor, ResourceKind};
pub use verb::Verb;
