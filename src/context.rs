use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{HelpdeskService, MessagingSdk};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub helpdesk: Arc<dyn HelpdeskService>,
    /// `None` when the LINE SDK is not available in this session.
    pub messaging: Option<Arc<dyn MessagingSdk>>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        helpdesk: Arc<dyn HelpdeskService>,
        messaging: Option<Arc<dyn MessagingSdk>>,
    ) -> Self {
        Self {
            config,
            helpdesk,
            messaging,
        }
    }
}
