pub mod helpdesk_api;
pub mod http;
pub mod line;
