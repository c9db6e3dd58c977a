use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::services::CredentialProvider;

const JSON_CONTENT_TYPE: &str = "application/json";

pub enum RequestBody {
    Json(Value),
    /// Sent verbatim, e.g. a body that is already serialized.
    Text(String),
    /// The transport sets the content type and boundary for these.
    Multipart(Form),
}

/// Everything needed to issue one API call besides the path and the
/// credentials.
pub struct RequestConfig {
    pub method: Method,
    pub data: Option<RequestBody>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RequestConfig {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            data: None,
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    /// Method-string plus optional body, the shape older call sites use.
    pub fn legacy(method: &str, body: Option<Value>) -> AppResult<Self> {
        let method = Method::from_bytes(method.trim().to_uppercase().as_bytes())
            .map_err(|_| AppError::Configuration(format!("invalid HTTP method '{method}'")))?;
        let mut config = Self::new(method);
        config.data = body.map(RequestBody::Json);
        Ok(config)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> AppResult<Self> {
        let value = serde_json::to_value(payload)
            .map_err(|err| AppError::Parse(format!("failed to serialize request body: {err}")))?;
        self.data = Some(RequestBody::Json(value));
        Ok(self)
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.data = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.data = Some(RequestBody::Multipart(form));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn is_multipart(&self) -> bool {
        matches!(self.data, Some(RequestBody::Multipart(_)))
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Issues the request and normalizes the outcome: parsed JSON on
    /// success (`Value::Null` for empty bodies), `AppError::Http` carrying a
    /// display-ready message otherwise.
    pub async fn request(
        &self,
        path: &str,
        config: RequestConfig,
        credentials: &dyn CredentialProvider,
    ) -> AppResult<Value> {
        let token = credentials.bearer_token();
        let headers = build_headers(token.as_deref(), &config.headers, config.is_multipart())?;
        let RequestConfig {
            method,
            data,
            query,
            ..
        } = config;

        let mut builder = self
            .http
            .request(method.clone(), self.endpoint(path))
            .headers(headers);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder = match data {
            Some(RequestBody::Json(value)) => {
                let body = serde_json::to_vec(&value).map_err(|err| {
                    AppError::Parse(format!("failed to serialize request body: {err}"))
                })?;
                builder.body(body)
            }
            Some(RequestBody::Text(text)) => builder.body(text),
            Some(RequestBody::Multipart(form)) => builder.multipart(form),
            None => builder,
        };

        debug!(%method, path, "sending api request");
        let response = builder.send().await.map_err(|err| {
            AppError::Transport(format!("failed to call {method} {path}: {err}"))
        })?;

        let status = response.status();
        info!(%method, path, status = status.as_u16(), "api response");

        if !status.is_success() {
            let message = error_message(response).await;
            warn!(%method, path, status = status.as_u16(), %message, "api request failed");
            return Err(AppError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let value = read_success(response).await?;
        debug!(%method, path, body = %value, "api response body");
        Ok(value)
    }

    pub async fn request_as<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
        credentials: &dyn CredentialProvider,
    ) -> AppResult<T> {
        let value = self.request(path, config, credentials).await?;
        serde_json::from_value(value)
            .map_err(|err| AppError::Parse(format!("unexpected response from {path}: {err}")))
    }
}

fn build_headers(
    token: Option<&str>,
    overrides: &[(String, String)],
    multipart: bool,
) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    if !multipart {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    }
    if let Some(token) = token.filter(|token| !token.is_empty()) {
        let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            AppError::Configuration("bearer token contains invalid characters".to_string())
        })?;
        headers.insert(AUTHORIZATION, value);
    }
    for (name, value) in overrides {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| AppError::Configuration(format!("invalid header name '{name}'")))?;
        if multipart && name == CONTENT_TYPE {
            continue;
        }
        let value = HeaderValue::from_str(value).map_err(|_| {
            AppError::Configuration(format!("invalid value for header '{name}'"))
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains(JSON_CONTENT_TYPE))
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("API Error: {}", status.as_u16()))
}

/// Error body shape produced by the backend framework.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<ErrorMessage>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, rename = "statusCode")]
    status_code: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    Single(String),
    Many(Vec<String>),
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        let message = match self.message {
            Some(ErrorMessage::Single(message)) => message,
            Some(ErrorMessage::Many(messages)) => messages.join(", "),
            None => String::new(),
        };
        if !message.is_empty() {
            return Some(message);
        }
        self.error.filter(|error| !error.is_empty())
    }
}

async fn error_message(response: Response) -> String {
    let fallback = status_text(response.status());
    if !is_json(response.headers()) {
        return fallback;
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(err) => {
            warn!(error = %err, "failed to read error response");
            return fallback;
        }
    };
    match serde_json::from_slice::<ErrorBody>(&body) {
        Ok(error) => {
            debug!(status_code = ?error.status_code, "api error body");
            error.into_message().unwrap_or(fallback)
        }
        Err(err) => {
            warn!(error = %err, "failed to parse error response");
            fallback
        }
    }
}

async fn read_success(response: Response) -> AppResult<Value> {
    if response.status() == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
        return Ok(Value::Null);
    }

    let json = is_json(response.headers());
    let body = response
        .text()
        .await
        .map_err(|err| AppError::Transport(format!("failed to read response body: {err}")))?;
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    if json {
        return serde_json::from_str(&body)
            .map_err(|err| AppError::Parse(format!("invalid JSON response: {err}")));
    }
    Ok(serde_json::from_str(&body).unwrap_or_else(|_| Value::String(body)))
}
