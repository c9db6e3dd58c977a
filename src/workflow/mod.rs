pub mod liff;
pub mod repair;
pub mod ticket;
pub mod user;
