use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::identity::LineProfile;
use crate::error::{AppError, AppResult};
use crate::services::MessagingSdk;

const LINE_API_BASE: &str = "https://api.line.me";
const LIFF_URL_BASE: &str = "https://liff.line.me";
const PROFILE_HAND_OFF_URL: &str = "line://nv/profile";

/// Response of the LINE access token verification endpoint.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    client_id: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// LINE platform access from a terminal session: the profile comes from the
/// LINE Profile API using a LIFF access token instead of the in-app SDK.
pub struct LineSdk {
    http: Client,
    api_base: String,
    access_token: Option<String>,
    in_client: bool,
}

impl LineSdk {
    pub fn new(access_token: Option<String>, in_client: bool) -> Self {
        Self::with_api_base(LINE_API_BASE, access_token, in_client)
    }

    pub fn with_api_base(
        api_base: impl Into<String>,
        access_token: Option<String>,
        in_client: bool,
    ) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into(),
            access_token: access_token.filter(|token| !token.trim().is_empty()),
            in_client,
        }
    }

    pub fn login_url(liff_id: &str) -> String {
        format!("{LIFF_URL_BASE}/{liff_id}")
    }

    fn profile_endpoint(&self) -> String {
        format!("{}/v2/profile", self.api_base.trim_end_matches('/'))
    }

    fn verify_endpoint(&self) -> String {
        format!("{}/oauth2/v2.1/verify", self.api_base.trim_end_matches('/'))
    }

    fn token(&self) -> AppResult<&str> {
        self.access_token
            .as_deref()
            .ok_or_else(|| AppError::Initialization("LINE user is not logged in".to_string()))
    }
}

/// The LINE channel a LIFF app belongs to is the part of its id before `-`.
fn channel_id(liff_id: &str) -> &str {
    liff_id.split_once('-').map_or(liff_id, |(channel, _)| channel)
}

#[async_trait]
impl MessagingSdk for LineSdk {
    fn is_logged_in(&self) -> bool {
        self.access_token.is_some()
    }

    fn login(&self, liff_id: &str) {
        eprintln!(
            "LINE login required: open {} and set HELPDESK_LINE_ACCESS_TOKEN.",
            Self::login_url(liff_id)
        );
    }

    async fn init(&self, liff_id: &str) -> AppResult<()> {
        let liff_id = liff_id.trim();
        if liff_id.is_empty() {
            return Err(AppError::Initialization(
                "LIFF id is not configured".to_string(),
            ));
        }
        let token = self.token()?;

        let response = self
            .http
            .get(self.verify_endpoint())
            .query(&[("access_token", token)])
            .send()
            .await
            .map_err(|err| AppError::Initialization(format!("failed to reach LINE: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Initialization(format!(
                "LINE access token was rejected ({status})"
            )));
        }

        let info = response.json::<TokenInfo>().await.map_err(|err| {
            AppError::Initialization(format!("failed to parse LINE token info: {err}"))
        })?;

        let expected = channel_id(liff_id);
        if info.client_id != expected {
            return Err(AppError::Initialization(format!(
                "LINE access token belongs to channel {}, expected {expected}",
                info.client_id
            )));
        }

        debug!(liff_id, expires_in = ?info.expires_in, "LIFF session initialized");
        Ok(())
    }

    fn is_in_client(&self) -> bool {
        self.in_client
    }

    async fn profile(&self) -> AppResult<LineProfile> {
        let token = self.token()?;

        let response = self
            .http
            .get(self.profile_endpoint())
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(|err| AppError::Initialization(format!("failed to reach LINE: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Initialization(format!(
                "LINE profile request failed with {status}"
            )));
        }

        response.json::<LineProfile>().await.map_err(|err| {
            AppError::Initialization(format!("failed to parse LINE profile: {err}"))
        })
    }

    /// There is no mini-app window in a terminal; hand the user back to
    /// their LINE profile instead.
    fn close_window(&self) {
        info!("LIFF window close requested");
        println!("Return to LINE: {PROFILE_HAND_OFF_URL}");
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn fetches_profile_with_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/profile"))
            .and(header("authorization", "Bearer liff-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "userId": "U1234",
                "displayName": "Malee",
                "pictureUrl": "https://profile.line-scdn.net/abc"
            })))
            .mount(&server)
            .await;

        let sdk = LineSdk::with_api_base(server.uri(), Some("liff-token".to_string()), true);
        assert!(sdk.is_logged_in());
        let profile = sdk.profile().await.unwrap();
        assert_eq!(profile.user_id, "U1234");
        assert_eq!(profile.display_name.as_deref(), Some("Malee"));
    }

    #[tokio::test]
    async fn expired_token_is_an_initialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let sdk = LineSdk::with_api_base(server.uri(), Some("stale".to_string()), true);
        let err = sdk.profile().await.unwrap_err();
        assert!(matches!(err, AppError::Initialization(_)));
    }

    #[tokio::test]
    async fn init_verifies_token_against_liff_channel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/v2.1/verify"))
            .and(query_param("access_token", "liff-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "scope": "profile openid",
                "client_id": "1668676101",
                "expires_in": 2591659
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sdk = LineSdk::with_api_base(server.uri(), Some("liff-token".to_string()), false);
        sdk.init("1668676101-JZwvBDDL").await.unwrap();
    }

    #[tokio::test]
    async fn rejected_token_fails_init() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/v2.1/verify"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_request",
                "error_description": "access token expired"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sdk = LineSdk::with_api_base(server.uri(), Some("revoked".to_string()), false);
        let err = sdk.init("1668676101-JZwvBDDL").await.unwrap_err();
        assert!(matches!(err, AppError::Initialization(_)));
    }

    #[tokio::test]
    async fn token_from_another_channel_fails_init() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/v2.1/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "scope": "profile",
                "client_id": "9999999999",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;

        let sdk = LineSdk::with_api_base(server.uri(), Some("other".to_string()), false);
        let err = sdk.init("1668676101-JZwvBDDL").await.unwrap_err();
        assert!(err.to_string().contains("9999999999"));
    }

    #[tokio::test]
    async fn bridge_reports_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/v2.1/verify"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let sdk = LineSdk::with_api_base(server.uri(), Some("revoked".to_string()), false);
        let state = crate::workflow::liff::initialize(
            Some(&sdk),
            "1668676101-JZwvBDDL",
            Some("/repairs/request?lineId=U1"),
        )
        .await;
        assert!(state.context.is_none());
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn close_window_hands_off_locally() {
        let server = MockServer::start().await;
        let sdk = LineSdk::with_api_base(server.uri(), Some("liff-token".to_string()), true);
        sdk.close_window();
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn channel_is_liff_id_prefix() {
        assert_eq!(channel_id("1668676101-JZwvBDDL"), "1668676101");
        assert_eq!(channel_id("1668676101"), "1668676101");
    }

    #[test]
    fn blank_token_is_not_logged_in() {
        let sdk = LineSdk::new(Some(String::new()), false);
        assert!(!sdk.is_logged_in());
        assert_eq!(
            LineSdk::login_url("123-abc"),
            "https://liff.line.me/123-abc"
        );
    }
}
