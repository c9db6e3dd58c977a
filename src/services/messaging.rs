use async_trait::async_trait;

use crate::domain::identity::LineProfile;
use crate::error::AppResult;

/// The subset of the LIFF SDK the bridge relies on.
#[async_trait]
pub trait MessagingSdk: Send + Sync {
    fn is_logged_in(&self) -> bool;
    /// Starts the platform login flow. The session does not continue locally.
    fn login(&self, liff_id: &str);
    async fn init(&self, liff_id: &str) -> AppResult<()>;
    fn is_in_client(&self) -> bool;
    async fn profile(&self) -> AppResult<LineProfile>;
    fn close_window(&self);
}
