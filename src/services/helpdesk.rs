use async_trait::async_trait;

use crate::domain::repair::{NewTicket, RepairSubmission};
use crate::domain::ticket::{StatusChange, Ticket, TicketUpdate};
use crate::domain::user::{User, UserForm};
use crate::error::AppResult;

#[async_trait]
pub trait HelpdeskService: Send + Sync {
    async fn list_tickets(&self) -> AppResult<Vec<Ticket>>;
    async fn get_ticket(&self, id: u64) -> AppResult<Ticket>;
    async fn update_ticket(&self, id: u64, update: &TicketUpdate) -> AppResult<()>;
    async fn change_status(&self, id: u64, change: &StatusChange) -> AppResult<()>;
    async fn create_ticket(&self, ticket: NewTicket) -> AppResult<Ticket>;
    async fn submit_repair(&self, submission: &RepairSubmission) -> AppResult<Ticket>;
    async fn tickets_for_user(&self, user_id: u64) -> AppResult<Vec<Ticket>>;

    async fn list_users(&self) -> AppResult<Vec<User>>;
    async fn get_user(&self, id: u64) -> AppResult<User>;
    async fn create_user(&self, form: &UserForm) -> AppResult<()>;
    async fn update_user(&self, id: u64, form: &UserForm) -> AppResult<()>;

    /// Backend user linked to a LINE account, if any.
    async fn linked_user(&self, line_id: &str) -> AppResult<Option<u64>>;
}
