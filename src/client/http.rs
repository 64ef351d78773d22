//! HTTP client for the admin REST backend.
//!
//! Every request except the login route carries the session's `token` and
//! `url-busqueda` headers. A 401 outside the login route ends the session
//! and publishes [`SessionEvent::Expired`].

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use super::session::{
    lock, FileSessionStore, MemorySessionStore, Session, SessionEvent, SessionStore, User,
    TOKEN_KEY, USER_KEY,
};
use crate::config::Config;
use crate::errors::AppError;

const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    url_busqueda: String,
    #[serde(default)]
    user: Option<User>,
}

#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Mutex<Session>,
    store: Arc<dyn SessionStore>,
    events: watch::Sender<SessionEvent>,
}

impl ApiClient {
    /// Build a client and restore any saved session from `store`.
    pub fn new(config: &Config, store: Arc<dyn SessionStore>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let session = Session::load(store.as_ref())?;
        let initial = if session.is_authenticated() {
            SessionEvent::Active
        } else {
            SessionEvent::LoggedOut
        };
        let (events, _) = watch::channel(initial);

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session: Mutex::new(session),
            store,
            events,
        })
    }

    /// Build a client whose session lives in the configured JSON file, or
    /// in memory when no session path is set.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let store: Arc<dyn SessionStore> = match &config.session_path {
            Some(path) => {
                tracing::info!("Session file: {:?}", path);
                Arc::new(FileSessionStore::new(path))
            }
            None => Arc::new(MemorySessionStore::new()),
        };
        Self::new(config, store)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> Session {
        lock(&self.session).clone()
    }

    /// Session lifecycle events; the latest value is always observable.
    pub fn subscribe(&self) -> watch::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Replace the current session and persist it.
    pub fn start_session(&self, session: Session) -> Result<(), AppError> {
        session.save(self.store.as_ref())?;
        *lock(&self.session) = session;
        self.events.send_replace(SessionEvent::Active);
        Ok(())
    }

    pub fn logout(&self) -> Result<(), AppError> {
        let session = Session::default();
        session.save(self.store.as_ref())?;
        *lock(&self.session) = session;
        self.events.send_replace(SessionEvent::LoggedOut);
        tracing::info!("Session closed");
        Ok(())
    }

    /// Authenticate against the backend and start a session from the reply.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AppError> {
        let reply: LoginResponse = self.post_json(LOGIN_PATH, credentials).await?;
        let session = Session {
            token: Some(reply.token),
            url_busqueda: Some(reply.url_busqueda),
            user: reply.user,
        };
        self.start_session(session.clone())?;
        tracing::info!("Logged in as {}", credentials.email);
        Ok(session)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if !is_login_route(path) {
            let session = lock(&self.session);
            if let Some((token, url_busqueda)) = session.auth_headers() {
                builder = builder
                    .header("token", token)
                    .header("url-busqueda", url_busqueda);
            }
        }
        builder
    }

    async fn send(&self, path: &str, builder: RequestBuilder) -> Result<Response, AppError> {
        let request = builder.build()?;
        let method = request.method().clone();
        tracing::debug!("Request: {} {}", method, path);

        let response = self.http.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!("Response: {} {} {}", status.as_u16(), method, path);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        self.on_failure(path, status, &body);
        Err(AppError::from_status(
            status.as_u16(),
            error_message(status, &body),
        ))
    }

    fn on_failure(&self, path: &str, status: StatusCode, body: &str) {
        tracing::warn!("Response error: {} {} {}", status.as_u16(), path, body);
        match status {
            StatusCode::UNAUTHORIZED if !is_login_route(path) => self.expire_session(),
            StatusCode::FORBIDDEN => tracing::error!("Access forbidden: {}", path),
            StatusCode::NOT_FOUND => tracing::error!("Resource not found: {}", path),
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Internal server error: {}", path)
            }
            _ => {}
        }
    }

    /// Drop the token and user, keep `url_busqueda`, and signal expiry.
    fn expire_session(&self) {
        tracing::info!("401 on a protected route, clearing session");
        {
            let mut session = lock(&self.session);
            session.token = None;
            session.user = None;
        }
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::error!("Failed to clear {} from session store: {}", key, e);
            }
        }
        self.events.send_replace(SessionEvent::Expired);
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, AppError> {
        let response = self.send(path, self.request(Method::GET, path).query(query)).await?;
        Self::decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(path, self.request(Method::POST, path).json(body)).await?;
        Self::decode(response).await
    }

    /// POST whose reply body is ignored.
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), AppError> {
        self.send(path, self.request(Method::POST, path).json(body)).await?;
        Ok(())
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(path, self.request(Method::PUT, path).json(body)).await?;
        Self::decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.send(path, self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    pub async fn get_bytes(&self, path: &str, query: &[(String, String)]) -> Result<Bytes, AppError> {
        let response = self.send(path, self.request(Method::GET, path).query(query)).await?;
        Ok(response.bytes().await?)
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, AppError> {
        let response = self
            .send(path, self.request(Method::POST, path).multipart(form))
            .await?;
        Self::decode(response).await
    }
}

fn is_login_route(path: &str) -> bool {
    path.contains(LOGIN_PATH)
}

/// Best message a failed response offers: a JSON `message`/`error` string,
/// the raw body, or the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    if !body.trim().is_empty() {
        return body.trim().to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_fields() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message":"nombre duplicado"}"#),
            "nombre duplicado"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error":"sin permiso"}"#),
            "sin permiso"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, " upstream down "), "upstream down");
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
    }

    #[test]
    fn test_login_route_detection() {
        assert!(is_login_route("/login"));
        assert!(is_login_route("/auth/login"));
        assert!(!is_login_route("/obras"));
    }
}
