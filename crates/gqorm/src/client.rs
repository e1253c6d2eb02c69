//! HTTP transport for rendered operations.
//!
//! The client owns the endpoint, a set of static headers, and a
//! `reqwest::Client`. It knows nothing about models or builders: it takes
//! anything implementing [`Operation`], posts `{"query", "variables"}` and
//! hands back the raw body bytes. Status classification happens here;
//! GraphQL-level errors are a decode-stage concern.

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};

use crate::error::{GqError, GqResult};
use crate::query::{GraphqlRequest, Operation};

/// A GraphQL endpoint client.
#[derive(Clone, Debug)]
pub struct Client {
    endpoint: String,
    http: reqwest::Client,
    headers: HeaderMap,
}

/// Fluent configuration for [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    endpoint: String,
    http: Option<reqwest::Client>,
    headers: HeaderMap,
}

impl ClientBuilder {
    fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: None,
            headers: HeaderMap::new(),
        }
    }

    /// Use a caller-supplied `reqwest::Client` instead of the default.
    ///
    /// The default client does not follow redirects, so 3xx responses
    /// surface as [`GqError::Redirect`]; a custom client chooses its own
    /// redirect policy.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Attach a static header to every request.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Authenticate with the Hasura admin secret header.
    pub fn admin_secret(self, secret: &SecretString) -> GqResult<Self> {
        let value = HeaderValue::from_str(secret.expose_secret())
            .map_err(|_| GqError::build("admin secret is not a valid header value"))?;
        Ok(self.header(HeaderName::from_static("x-hasura-admin-secret"), value))
    }

    /// Authenticate with a bearer token.
    pub fn bearer_token(self, token: &SecretString) -> GqResult<Self> {
        let value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| GqError::build("bearer token is not a valid header value"))?;
        Ok(self.header(reqwest::header::AUTHORIZATION, value))
    }

    /// Finish building the client.
    pub fn build(self) -> GqResult<Client> {
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()?,
        };
        Ok(Client {
            endpoint: self.endpoint,
            http,
            headers: self.headers,
        })
    }
}

impl Client {
    /// A client for `endpoint` with default configuration.
    pub fn new(endpoint: impl Into<String>) -> GqResult<Self> {
        Self::builder(endpoint).build()
    }

    /// Start configuring a client for `endpoint`.
    pub fn builder(endpoint: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(endpoint)
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute a rendered operation and return the raw response body.
    ///
    /// Build problems surface before any network traffic. 3xx and 4xx/5xx
    /// statuses map to [`GqError::Redirect`] and [`GqError::Status`]; a 2xx
    /// body is returned as-is, including bodies that carry GraphQL-level
    /// errors.
    pub async fn execute(&self, operation: &impl Operation) -> GqResult<Bytes> {
        operation.validate()?;

        let body = GraphqlRequest {
            query: operation.query(),
            variables: operation.variables(),
        };
        trace!(document = %body.query, "rendered graphql document");
        debug!(endpoint = %self.endpoint, "posting graphql operation");

        let response = self
            .http
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_redirection() {
            debug!(status = status.as_u16(), "graphql request redirected");
            return Err(GqError::Redirect {
                status: status.as_u16(),
            });
        }
        if status.is_client_error() || status.is_server_error() {
            debug!(status = status.as_u16(), "graphql request failed");
            return Err(GqError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?)
    }
}
