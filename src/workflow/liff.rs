use reqwest::Url;
use tracing::{info, warn};

use crate::domain::identity::LineContext;
use crate::services::MessagingSdk;

const LINE_ID_PARAM: &str = "lineId";
const PAGE_BASE: &str = "http://localhost/";
const DEFAULT_INIT_ERROR: &str = "Failed to initialize LIFF";

/// Result of one bridge initialization. Once returned, nothing is pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiffState {
    pub context: Option<LineContext>,
    pub error: Option<String>,
    /// The SDK login flow was started; no identity is available this run.
    pub login_started: bool,
}

/// Resolves the LINE identity for this session. Failures end up in
/// `LiffState::error` instead of being returned.
pub async fn initialize(
    sdk: Option<&dyn MessagingSdk>,
    liff_id: &str,
    page_url: Option<&str>,
) -> LiffState {
    let Some(sdk) = sdk else {
        return LiffState::default();
    };

    if !sdk.is_logged_in() {
        info!("LINE user not logged in, starting login flow");
        sdk.login(liff_id);
        return LiffState {
            login_started: true,
            ..LiffState::default()
        };
    }

    if let Err(err) = sdk.init(liff_id).await {
        return failed(err.to_string());
    }

    if sdk.is_in_client() {
        return match sdk.profile().await {
            Ok(profile) => LiffState {
                context: Some(LineContext::from_profile(profile)),
                ..LiffState::default()
            },
            Err(err) => failed(err.to_string()),
        };
    }

    LiffState {
        context: page_url.and_then(line_id_from_url).map(LineContext::unlinked),
        ..LiffState::default()
    }
}

fn failed(message: String) -> LiffState {
    let message = if message.trim().is_empty() {
        DEFAULT_INIT_ERROR.to_string()
    } else {
        message
    };
    warn!(error = %message, "LIFF initialization failed");
    LiffState {
        error: Some(message),
        ..LiffState::default()
    }
}

/// Reads `lineId` from an absolute URL, a path with a query, or a bare query.
pub fn line_id_from_url(page_url: &str) -> Option<String> {
    let base = Url::parse(PAGE_BASE).ok()?;
    let url = base.join(page_url.trim()).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == LINE_ID_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn close_window(sdk: Option<&dyn MessagingSdk>) {
    if let Some(sdk) = sdk {
        sdk.close_window();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::identity::LineProfile;
    use crate::error::{AppError, AppResult};

    #[derive(Default)]
    pub(crate) struct FakeSdk {
        pub logged_in: bool,
        pub in_client: bool,
        pub init_error: Option<String>,
        pub profile: Option<LineProfile>,
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl FakeSdk {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessagingSdk for FakeSdk {
        fn is_logged_in(&self) -> bool {
            self.logged_in
        }

        fn login(&self, _liff_id: &str) {
            self.record("login");
        }

        async fn init(&self, _liff_id: &str) -> AppResult<()> {
            self.record("init");
            match &self.init_error {
                Some(message) => Err(AppError::Initialization(message.clone())),
                None => Ok(()),
            }
        }

        fn is_in_client(&self) -> bool {
            self.in_client
        }

        async fn profile(&self) -> AppResult<LineProfile> {
            self.record("profile");
            self.profile
                .clone()
                .ok_or_else(|| AppError::Initialization("no profile".to_string()))
        }

        fn close_window(&self) {
            self.record("close");
        }
    }

    #[tokio::test]
    async fn missing_sdk_resolves_with_empty_context() {
        let state = initialize(None, "liff", Some("/repairs?lineId=U1")).await;
        assert_eq!(state, LiffState::default());
    }

    #[tokio::test]
    async fn logged_out_user_triggers_login_only() {
        let sdk = FakeSdk::default();
        let state = initialize(Some(&sdk), "liff", None).await;
        assert!(state.login_started);
        assert!(state.context.is_none());
        assert_eq!(sdk.calls(), vec!["login"]);
    }

    #[tokio::test]
    async fn in_client_publishes_profile() {
        let sdk = FakeSdk {
            logged_in: true,
            in_client: true,
            profile: Some(LineProfile {
                user_id: "U99".to_string(),
                display_name: None,
                picture_url: Some("https://img/1".to_string()),
            }),
            ..FakeSdk::default()
        };
        let state = initialize(Some(&sdk), "liff", None).await;
        let context = state.context.unwrap();
        assert_eq!(context.user_id, "U99");
        assert_eq!(context.display_name, "Unknown");
        assert_eq!(context.picture_url, "https://img/1");
        assert!(context.is_linked);
        assert_eq!(sdk.calls(), vec!["init", "profile"]);
    }

    #[tokio::test]
    async fn browser_falls_back_to_query_parameter() {
        let sdk = FakeSdk {
            logged_in: true,
            ..FakeSdk::default()
        };
        let state = initialize(
            Some(&sdk),
            "liff",
            Some("https://helpdesk.example.com/repairs/request?lineId=Uweb"),
        )
        .await;
        let context = state.context.unwrap();
        assert_eq!(context.user_id, "Uweb");
        assert_eq!(context.display_name, "LINE User");
        assert!(!context.is_linked);
    }

    #[tokio::test]
    async fn browser_without_line_id_has_no_context() {
        let sdk = FakeSdk {
            logged_in: true,
            ..FakeSdk::default()
        };
        let state = initialize(Some(&sdk), "liff", Some("/repairs/status")).await;
        assert_eq!(state, LiffState::default());
    }

    #[tokio::test]
    async fn init_failure_becomes_readable_error() {
        let sdk = FakeSdk {
            logged_in: true,
            in_client: true,
            init_error: Some("invalid LIFF id".to_string()),
            ..FakeSdk::default()
        };
        let state = initialize(Some(&sdk), "bad", None).await;
        assert_eq!(state.error.as_deref(), Some("invalid LIFF id"));
        assert!(state.context.is_none());

        let blank = FakeSdk {
            logged_in: true,
            init_error: Some(String::new()),
            ..FakeSdk::default()
        };
        let state = initialize(Some(&blank), "bad", None).await;
        assert_eq!(state.error.as_deref(), Some(DEFAULT_INIT_ERROR));
    }

    #[test]
    fn reads_line_id_from_relative_urls() {
        assert_eq!(line_id_from_url("?lineId=U1").as_deref(), Some("U1"));
        assert_eq!(
            line_id_from_url("/repairs/status?foo=1&lineId=U2").as_deref(),
            Some("U2")
        );
        assert_eq!(line_id_from_url("/repairs/status?lineId="), None);
    }

    #[test]
    fn close_window_is_noop_without_sdk() {
        close_window(None);
        let sdk = FakeSdk::default();
        close_window(Some(&sdk));
        assert_eq!(sdk.calls(), vec!["close"]);
    }
}
