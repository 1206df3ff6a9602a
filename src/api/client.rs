//! Speckle Client
//!
//! Main entry point: owns the session, authenticates, and hands out
//! resource handles bound to the current credentials.

use super::http::SpeckleHttpClient;
use super::session::{Principal, Session};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::resource::envelope::{self, Payload};
use crate::resource::{
    Accounts, ApiClients, Comments, Objects, Projects, Resource, ResourceKind, Streams,
};
use crate::schema::{strip_empty, SchemaRegistry};
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;

/// Main Speckle client
///
/// Not meant to be shared across threads while logging in: `login` and
/// `register` take `&mut self`. Handles returned by the accessors carry a
/// snapshot of the session taken when they were created.
#[derive(Clone)]
pub struct SpeckleClient {
    http: SpeckleHttpClient,
    session: Session,
    schemas: Arc<SchemaRegistry>,
}

impl SpeckleClient {
    /// Create an unauthenticated client with the built-in schema registry
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_registry(config, SchemaRegistry::builtin())
    }

    /// Create a client with a caller-supplied schema registry
    pub fn with_registry(config: &Config, schemas: SchemaRegistry) -> Result<Self> {
        let http = SpeckleHttpClient::new(config.timeout())?;
        let session = Session::new(config.server_url());
        tracing::debug!("Speckle client for {}", session.server);

        Ok(Self {
            http,
            session,
            schemas: Arc::new(schemas),
        })
    }

    /// API root, `{scheme}://{host}/api/{version}`
    pub fn server(&self) -> &str {
        &self.session.server
    }

    pub fn me(&self) -> Option<&Principal> {
        self.session.me.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Register a new user, then log in with the same credentials
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        company: &str,
        name: Option<&str>,
        surname: Option<&str>,
    ) -> Result<()> {
        let body = strip_empty(json!({
            "name": name,
            "surname": surname,
            "email": email,
            "password": password,
            "company": company,
        }));

        match self.post_auth("accounts/register", &body).await {
            Ok(_) => {},
            Err(Error::ServerRejected { message, .. }) => {
                tracing::warn!("Registration of {} rejected: {}", email, message);
                return Err(Error::RegistrationFailed(message));
            },
            Err(e) => return Err(e),
        }

        tracing::info!("Registered {}", email);
        self.login(email, password).await
    }

    /// Log in and use the returned token for every later request
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let body = json!({ "email": email, "password": password });

        let payload = match self.post_auth("accounts/login", &body).await {
            Ok(payload) => payload,
            Err(Error::ServerRejected { message, .. }) => {
                tracing::warn!("Login of {} rejected: {}", email, message);
                return Err(Error::AuthenticationFailed(message));
            },
            Err(e) => return Err(e),
        };

        let Payload::One(resource) = payload else {
            return Err(Error::Decode("login response carries no resource".to_string()));
        };
        let me: Principal = serde_json::from_value(resource)?;
        if me.token.is_none() {
            return Err(Error::AuthenticationFailed(
                "login response carries no token".to_string(),
            ));
        }

        tracing::info!("Logged in as {}", email);
        self.session.authenticate(me);
        Ok(())
    }

    /// Adopt a token obtained earlier (e.g. from the account cache)
    pub fn set_token(&mut self, token: &str) {
        self.session.token = Some(token.to_string());
    }

    /// Forget the token and principal; later handles send no `Authorization`
    pub fn logout(&mut self) {
        if let Some(me) = self.session.me.as_ref().and_then(|me| me.email.as_deref()) {
            tracing::info!("Logged out {}", me);
        }
        self.session.token = None;
        self.session.me = None;
    }

    async fn post_auth(&self, path: &str, body: &Value) -> Result<Payload> {
        let url = self.session.url(path);
        let response = self.http.send(Method::POST, &url, None, Some(body)).await?;
        envelope::open(response.body, response.status)
    }

    // =========================================================================
    // Resources
    // =========================================================================

    /// Fresh dispatcher for `kind`, bound to the current session
    pub fn resource(&self, kind: ResourceKind) -> Resource {
        Resource::new(
            self.http.clone(),
            self.session.clone(),
            Arc::clone(&self.schemas),
            kind.descriptor(),
        )
    }

    /// Dispatcher looked up by name; unknown names fail with `UnknownResource`
    pub fn resource_by_name(&self, name: &str) -> Result<Resource> {
        Ok(self.resource(ResourceKind::from_name(name)?))
    }

    pub fn accounts(&self) -> Accounts {
        Accounts::new(self.resource(ResourceKind::Accounts))
    }

    pub fn api_clients(&self) -> ApiClients {
        ApiClients::new(self.resource(ResourceKind::ApiClients))
    }

    pub fn comments(&self) -> Comments {
        Comments::new(self.resource(ResourceKind::Comments))
    }

    pub fn objects(&self) -> Objects {
        Objects::new(self.resource(ResourceKind::Objects))
    }

    pub fn projects(&self) -> Projects {
        Projects::new(self.resource(ResourceKind::Projects))
    }

    pub fn streams(&self) -> Streams {
        Streams::new(self.resource(ResourceKind::Streams))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_is_unauthenticated() {
        let client = SpeckleClient::new(&Config::for_host("localhost:3000", false)).unwrap();
        assert_eq!(client.server(), "http://localhost:3000/api/v1");
        assert!(!client.is_authenticated());
        assert!(client.me().is_none());
        assert!(!client.schemas().is_empty());
    }

    #[test]
    fn test_resource_lookup_by_name() {
        let client = SpeckleClient::new(&Config::for_host("localhost:3000", false)).unwrap();
        assert_eq!(client.resource_by_name("projects").unwrap().name(), "projects");
        assert_eq!(client.api_clients().name(), "clients");
        assert!(matches!(
            client.resource_by_name("teapots"),
            Err(Error::UnknownResource(_))
        ));
    }

    #[test]
    fn test_set_token_authenticates() {
        let mut client = SpeckleClient::new(&Config::for_host("localhost:3000", false)).unwrap();
        client.set_token("JWT cached");
        assert_eq!(client.token(), Some("JWT cached"));
        assert!(client.streams().me().is_none());

        client.logout();
        assert!(!client.is_authenticated());
    }
}
