//! Atlas backend client.

use atlas_core::{
    AtlasError, AuthResponse, Credential, LoginCredentials, Profile, Result, Role, Session,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::accounts::HttpAccountStore;
use crate::config::ClientConfig;
use crate::projects::HttpProjectStore;

/// Client for an Atlas backend.
///
/// Every request carries the session's bearer token, read at send time.
#[derive(Clone)]
pub struct AtlasClient {
    /// Base URL of the backend.
    base_url: String,

    /// HTTP client.
    http_client: reqwest::Client,

    session: Session,
}

impl std::fmt::Debug for AtlasClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AtlasClient {
    /// Build a client. No request is made.
    pub fn new(config: ClientConfig, session: Session) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AtlasError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            session,
        })
    }

    /// Build a client and verify the backend answers its health check.
    pub async fn connect(config: ClientConfig, session: Session) -> Result<Self> {
        let client = Self::new(config, session)?;
        client.health().await?;
        Ok(client)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Project collection at `/project`.
    pub fn projects(&self) -> HttpProjectStore {
        HttpProjectStore::new(self.clone())
    }

    /// Account collections at `/professor` and `/adm`.
    pub fn accounts(&self) -> HttpAccountStore {
        HttpAccountStore::new(self.clone())
    }

    pub async fn health(&self) -> Result<()> {
        let response = self
            .request(Method::GET, "/health")
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response, "Health", None).await?;
        Ok(())
    }

    /// Log in and establish the session.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Role> {
        let response = self
            .request(Method::POST, "/auth/login")
            .json(credentials)
            .send()
            .await
            .map_err(transport_error)?;
        let auth: AuthResponse = read_json(check_status(response, "Session", None).await?).await?;

        if auth.token.trim().is_empty() {
            return Err(AtlasError::Unauthorized(
                "Invalid authentication response".to_string(),
            ));
        }
        let role: Role = auth.role.parse()?;

        self.session.establish(Credential::new(auth.token, role))?;
        info!(login = %credentials.login, role = %role, "Logged in");
        Ok(role)
    }

    /// Drop the local credential. The backend keeps no logout state.
    pub fn logout(&self) {
        self.session.invalidate();
        info!("Logged out");
    }

    pub async fn register_professor(&self, credentials: &LoginCredentials) -> Result<()> {
        self.register("/auth/register/professor", credentials).await
    }

    pub async fn register_admin(&self, credentials: &LoginCredentials) -> Result<()> {
        self.register("/auth/register/adm", credentials).await
    }

    async fn register(&self, path: &str, credentials: &LoginCredentials) -> Result<()> {
        let response = self
            .request(Method::POST, path)
            .json(credentials)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response, "Account", None).await?;
        info!(login = %credentials.login, path, "Account registered");
        Ok(())
    }

    /// The logged-in account.
    pub async fn profile(&self) -> Result<Profile> {
        let response = self
            .request(Method::GET, "/auth/profile")
            .send()
            .await
            .map_err(transport_error)?;
        read_json(check_status(response, "Profile", None).await?).await
    }

    /// Start a request to `path`, attaching the bearer token if any.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Sending request");

        let builder = self.http_client.request(method, url);
        match self.session.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Network failures, timeouts included, are all connectivity errors.
pub(crate) fn transport_error(err: reqwest::Error) -> AtlasError {
    if err.is_timeout() {
        warn!(error = %err, "Request timed out");
        AtlasError::Connection(format!("Request timed out: {err}"))
    } else if err.is_decode() {
        AtlasError::Serialization(err.to_string())
    } else {
        warn!(error = %err, "Request failed");
        AtlasError::Connection(err.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Pull a human message out of an error body: `{"message": ..}`,
/// `{"error": ..}`, or the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorBody {
            error: Some(error), ..
        }) => error,
        _ => body.to_string(),
    }
}

/// Translate an HTTP status into the error taxonomy.
pub(crate) fn status_error(
    status: StatusCode,
    body: &str,
    resource_type: &str,
    id: Option<&str>,
) -> AtlasError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            let message = message.trim();
            AtlasError::Unauthorized(if message.is_empty() {
                "Session expired or role not allowed".to_string()
            } else {
                message.to_string()
            })
        }
        StatusCode::NOT_FOUND => AtlasError::NotFound {
            resource_type: resource_type.to_string(),
            id: id.unwrap_or("-").to_string(),
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            AtlasError::Connection(format!("Server timed out ({status})"))
        }
        s if s.is_client_error() => AtlasError::rejected(message),
        s => AtlasError::Internal(format!("Server error {}: {}", s.as_u16(), message.trim())),
    }
}

/// Pass successful responses through, turn the rest into errors.
pub(crate) async fn check_status(
    response: Response,
    resource_type: &str,
    id: Option<&str>,
) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let err = status_error(status, &body, resource_type, id);
    warn!(status = status.as_u16(), error = %err, "Backend rejected request");
    Err(err)
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    Ok(serde_json::from_slice(&bytes)?)
}
