use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use super::session::SessionStore;
use crate::error::CoreError;

pub const REFRESH_PATH: &str = "/api/auth/refresh";
const AUTH_PREFIX: &str = "/api/auth/";

const UNEXPECTED_DETAIL: &str = "An unexpected error occurred";
const UNKNOWN_CODE: &str = "UNKNOWN_ERROR";

type RefreshFuture = Shared<BoxFuture<'static, bool>>;

/// JSON-over-HTTP client for the Life OS backend.
///
/// Every request carries the session cookies. A `401` from any non-auth
/// endpoint triggers one `POST /api/auth/refresh` (shared by all callers that
/// hit the `401` while it is in flight) followed by a single retry. When the
/// refresh is rejected the call fails with [`CoreError::SessionExpired`].
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    session: Arc<SessionStore>,
    refresh: Mutex<Option<RefreshFuture>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        Self::with_session(base_url, Arc::new(SessionStore::new()))
    }

    pub fn with_session(base_url: &str, session: Arc<SessionStore>) -> Result<Self, CoreError> {
        // validate early so a bad `api_url` fails before the first request
        Url::parse(base_url)?;
        let http = reqwest::Client::builder()
            .cookie_provider(session.clone())
            .build()?;
        Ok(Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
            session,
            refresh: Mutex::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CoreError> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CoreError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, &[], Some(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, CoreError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PATCH, path, query, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CoreError> {
        self.request(Method::DELETE, path, query, None).await
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, CoreError> {
        let url = self.url(path, query)?;
        debug!(%method, %url, "api request");

        let mut response = self.execute(method.clone(), url.clone(), body.as_ref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED && !path.starts_with(AUTH_PREFIX) {
            if !self.refresh_session().await {
                return Err(CoreError::SessionExpired);
            }
            debug!(%method, %url, "retrying after session refresh");
            response = self.execute(method, url, body.as_ref()).await?;
        }

        decode(response).await
    }

    /// Refresh the session cookies, joining a refresh already in flight.
    ///
    /// Returns whether the backend accepted the refresh.
    pub async fn refresh_session(&self) -> bool {
        let pending = {
            let mut slot = self.refresh.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    let pending = self.refresh_future();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        let refreshed = pending.clone().await;

        let mut slot = self.refresh.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|current| Shared::ptr_eq(current, &pending)) {
            *slot = None;
        }
        refreshed
    }

    fn refresh_future(&self) -> RefreshFuture {
        let http = self.http.clone();
        let url = format!("{}{}", self.base, REFRESH_PATH);
        async move {
            info!("refreshing session");
            match http.post(&url).send().await {
                Ok(response) if response.status().is_success() => true,
                Ok(response) => {
                    warn!(status = response.status().as_u16(), "session refresh rejected");
                    false
                }
                Err(err) => {
                    warn!(error = %err, "session refresh failed");
                    false
                }
            }
        }
        .boxed()
        .shared()
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Response, CoreError> {
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, CoreError> {
        let mut url = Url::parse(&format!("{}{}", self.base, path))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CoreError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &bytes));
    }

    if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

/// Build an API error from a non-2xx body of the form `{detail, code?}`.
pub(crate) fn api_error(status: u16, body: &[u8]) -> CoreError {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let detail = match parsed.as_ref().and_then(|v| v.get("detail")) {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Null) | None => UNEXPECTED_DETAIL.to_string(),
        Some(structured) => structured.to_string(),
    };
    let code = parsed
        .as_ref()
        .and_then(|v| v.get("code"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_CODE)
        .to_string();
    CoreError::Api {
        status,
        code,
        detail,
    }
}
