use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::domain::repair::{NewTicket, RepairSubmission};
use crate::domain::ticket::{StatusChange, Ticket, TicketUpdate};
use crate::domain::user::{User, UserForm};
use crate::error::AppResult;
use crate::infra::http::{ApiClient, RequestConfig};
use crate::services::{CredentialProvider, HelpdeskService};

const TICKETS_PATH: &str = "/api/tickets";
const USERS_PATH: &str = "/api/users";
const LINK_STATUS_PATH: &str = "/api/line-oa/linking/status";

/// `HelpdeskService` backed by the REST API.
pub struct HttpHelpdesk {
    api: ApiClient,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpHelpdesk {
    pub fn new(api: ApiClient, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { api, credentials }
    }

    fn ticket_path(id: u64) -> String {
        format!("{TICKETS_PATH}/{id}")
    }

    fn user_path(id: u64) -> String {
        format!("{USERS_PATH}/{id}")
    }

    fn ticket_form(ticket: NewTicket) -> Form {
        let mut form = ticket
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        for file in ticket.files {
            form = form.part("files", Part::bytes(file.content).file_name(file.file_name));
        }
        form
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkStatus {
    #[serde(default)]
    user_id: Option<u64>,
}

#[async_trait]
impl HelpdeskService for HttpHelpdesk {
    async fn list_tickets(&self) -> AppResult<Vec<Ticket>> {
        self.api
            .request_as(TICKETS_PATH, RequestConfig::get(), self.credentials.as_ref())
            .await
    }

    async fn get_ticket(&self, id: u64) -> AppResult<Ticket> {
        self.api
            .request_as(
                &Self::ticket_path(id),
                RequestConfig::get(),
                self.credentials.as_ref(),
            )
            .await
    }

    async fn update_ticket(&self, id: u64, update: &TicketUpdate) -> AppResult<()> {
        self.api
            .request(
                &Self::ticket_path(id),
                RequestConfig::put().json(update)?,
                self.credentials.as_ref(),
            )
            .await?;
        Ok(())
    }

    async fn change_status(&self, id: u64, change: &StatusChange) -> AppResult<()> {
        let path = format!("{}/status", Self::ticket_path(id));
        self.api
            .request(
                &path,
                RequestConfig::put().json(change)?,
                self.credentials.as_ref(),
            )
            .await?;
        Ok(())
    }

    async fn create_ticket(&self, ticket: NewTicket) -> AppResult<Ticket> {
        let config = RequestConfig::post().multipart(Self::ticket_form(ticket));
        self.api
            .request_as(TICKETS_PATH, config, self.credentials.as_ref())
            .await
    }

    async fn submit_repair(&self, submission: &RepairSubmission) -> AppResult<Ticket> {
        self.api
            .request_as(
                TICKETS_PATH,
                RequestConfig::post().json(submission)?,
                self.credentials.as_ref(),
            )
            .await
    }

    async fn tickets_for_user(&self, user_id: u64) -> AppResult<Vec<Ticket>> {
        let path = format!("{TICKETS_PATH}/user/{user_id}");
        self.api
            .request_as(&path, RequestConfig::get(), self.credentials.as_ref())
            .await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.api
            .request_as(USERS_PATH, RequestConfig::get(), self.credentials.as_ref())
            .await
    }

    async fn get_user(&self, id: u64) -> AppResult<User> {
        self.api
            .request_as(
                &Self::user_path(id),
                RequestConfig::get(),
                self.credentials.as_ref(),
            )
            .await
    }

    async fn create_user(&self, form: &UserForm) -> AppResult<()> {
        self.api
            .request(
                USERS_PATH,
                RequestConfig::post().json(form)?,
                self.credentials.as_ref(),
            )
            .await?;
        Ok(())
    }

    async fn update_user(&self, id: u64, form: &UserForm) -> AppResult<()> {
        self.api
            .request(
                &Self::user_path(id),
                RequestConfig::put().json(form)?,
                self.credentials.as_ref(),
            )
            .await?;
        Ok(())
    }

    async fn linked_user(&self, line_id: &str) -> AppResult<Option<u64>> {
        let config = RequestConfig::get().query("lineId", line_id);
        let status: LinkStatus = self
            .api
            .request_as(LINK_STATUS_PATH, config, self.credentials.as_ref())
            .await?;
        Ok(status.user_id)
    }
}
