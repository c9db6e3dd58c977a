pub mod config;
pub mod line;
pub mod repair;
pub mod ticket;
pub mod user;
