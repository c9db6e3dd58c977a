use serde::Deserialize;

pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown";
pub const UNLINKED_DISPLAY_NAME: &str = "LINE User";

/// Identity of the LINE user driving the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineContext {
    pub user_id: String,
    pub display_name: String,
    pub picture_url: String,
    /// `true` when the identity came from the SDK profile, `false` when it
    /// was only taken from the page URL.
    pub is_linked: bool,
}

impl LineContext {
    pub fn from_profile(profile: LineProfile) -> Self {
        Self {
            user_id: profile.user_id,
            display_name: profile
                .display_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNKNOWN_DISPLAY_NAME.to_string()),
            picture_url: profile.picture_url.unwrap_or_default(),
            is_linked: true,
        }
    }

    pub fn unlinked(line_id: String) -> Self {
        Self {
            user_id: line_id,
            display_name: UNLINKED_DISPLAY_NAME.to_string(),
            picture_url: String::new(),
            is_linked: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProfile {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
}
