pub mod credentials;
pub mod helpdesk;
pub mod messaging;

pub use credentials::{CredentialProvider, StaticToken};
pub use helpdesk::HelpdeskService;
pub use messaging::MessagingSdk;
