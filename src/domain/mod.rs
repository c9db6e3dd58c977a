pub mod category;
pub mod identity;
pub mod repair;
pub mod ticket;
pub mod user;
pub mod validation;
