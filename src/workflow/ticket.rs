use tracing::info;

use crate::context::AppContext;
use crate::domain::repair::NewTicket;
use crate::domain::ticket::{StatusChange, Ticket, TicketStatus, TicketUpdate};
use crate::error::AppResult;

/// Changes requested for an existing ticket. Unset fields keep their
/// current values.
#[derive(Debug, Clone, Default)]
pub struct TicketEdit {
    pub status: Option<TicketStatus>,
    pub assigned_to: Option<u64>,
    pub notes: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePlan {
    /// Status moves with an explanatory comment; sent to the status endpoint.
    StatusChange(StatusChange),
    Update(TicketUpdate),
}

pub fn plan_update(current: &Ticket, edit: TicketEdit) -> UpdatePlan {
    let status = edit.status.unwrap_or_else(|| current.status.clone());
    let comment = edit.comment.filter(|comment| !comment.trim().is_empty());

    if status != current.status {
        if let Some(comment) = comment {
            return UpdatePlan::StatusChange(StatusChange { status, comment });
        }
    }

    UpdatePlan::Update(TicketUpdate {
        status,
        assigned_to: edit.assigned_to.or_else(|| current.assignee_id()),
        notes: edit.notes.filter(|notes| !notes.trim().is_empty()),
    })
}

pub async fn update_ticket(ctx: &AppContext, id: u64, edit: TicketEdit) -> AppResult<Ticket> {
    let current = ctx.helpdesk.get_ticket(id).await?;

    match plan_update(&current, edit) {
        UpdatePlan::StatusChange(change) => {
            info!(id, status = change.status.as_str(), "changing ticket status");
            ctx.helpdesk.change_status(id, &change).await?;
        }
        UpdatePlan::Update(update) => {
            info!(id, status = update.status.as_str(), "updating ticket");
            ctx.helpdesk.update_ticket(id, &update).await?;
        }
    }

    ctx.helpdesk.get_ticket(id).await
}

pub async fn list_tickets(
    ctx: &AppContext,
    status: Option<&TicketStatus>,
    search: Option<&str>,
) -> AppResult<Vec<Ticket>> {
    let tickets = ctx.helpdesk.list_tickets().await?;
    Ok(filter_tickets(tickets, status, search))
}

/// Keeps tickets with the given status whose code or title contains the
/// search text, ignoring case. A blank search matches everything.
pub fn filter_tickets(
    tickets: Vec<Ticket>,
    status: Option<&TicketStatus>,
    search: Option<&str>,
) -> Vec<Ticket> {
    let needle = search
        .map(str::trim)
        .filter(|needle| !needle.is_empty())
        .map(str::to_lowercase);

    tickets
        .into_iter()
        .filter(|ticket| status.is_none_or(|status| &ticket.status == status))
        .filter(|ticket| match &needle {
            Some(needle) => {
                ticket.ticket_code.to_lowercase().contains(needle)
                    || ticket.title.to_lowercase().contains(needle)
            }
            None => true,
        })
        .collect()
}

pub async fn create_ticket(ctx: &AppContext, ticket: NewTicket) -> AppResult<Ticket> {
    ticket.validate().into_result()?;
    ctx.helpdesk.create_ticket(ticket).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::UserRef;

    fn ticket(status: TicketStatus) -> Ticket {
        Ticket {
            id: 3,
            status,
            assignee: Some(UserRef {
                id: Some(11),
                name: "Prasert".to_string(),
                ..UserRef::default()
            }),
            ..Ticket::default()
        }
    }

    fn listed(id: u64, code: &str, title: &str, status: TicketStatus) -> Ticket {
        Ticket {
            id,
            ticket_code: code.to_string(),
            title: title.to_string(),
            status,
            ..Ticket::default()
        }
    }

    #[test]
    fn search_combines_with_status_filter() {
        let tickets = vec![
            listed(1, "TK-0101", "Printer jam on 3rd floor", TicketStatus::Open),
            listed(2, "TK-0102", "Wi-Fi drops", TicketStatus::Open),
            listed(3, "PRN-7", "Monitor flicker", TicketStatus::Open),
            listed(4, "TK-0104", "PRINTER out of toner", TicketStatus::Done),
        ];

        let ids = |found: Vec<Ticket>| found.iter().map(|t| t.id).collect::<Vec<_>>();

        let found = filter_tickets(tickets.clone(), Some(&TicketStatus::Open), Some("pRn"));
        assert_eq!(ids(found), vec![3]);

        let found = filter_tickets(tickets.clone(), Some(&TicketStatus::Open), Some("PRINTER"));
        assert_eq!(ids(found), vec![1]);

        let found = filter_tickets(tickets.clone(), None, Some("printer"));
        assert_eq!(ids(found), vec![1, 4]);

        let found = filter_tickets(tickets, Some(&TicketStatus::Open), Some("  "));
        assert_eq!(ids(found), vec![1, 2, 3]);
    }

    #[test]
    fn status_change_with_comment_uses_status_endpoint() {
        let plan = plan_update(
            &ticket(TicketStatus::Open),
            TicketEdit {
                status: Some(TicketStatus::InProgress),
                comment: Some("On my way".to_string()),
                ..TicketEdit::default()
            },
        );
        assert_eq!(
            plan,
            UpdatePlan::StatusChange(StatusChange {
                status: TicketStatus::InProgress,
                comment: "On my way".to_string(),
            })
        );
    }

    #[test]
    fn status_change_without_comment_is_plain_update() {
        let plan = plan_update(
            &ticket(TicketStatus::Open),
            TicketEdit {
                status: Some(TicketStatus::Done),
                comment: Some("   ".to_string()),
                ..TicketEdit::default()
            },
        );
        assert_eq!(
            plan,
            UpdatePlan::Update(TicketUpdate {
                status: TicketStatus::Done,
                assigned_to: Some(11),
                notes: None,
            })
        );
    }

    #[test]
    fn unchanged_status_keeps_current_values() {
        let plan = plan_update(
            &ticket(TicketStatus::WaitingUser),
            TicketEdit {
                assigned_to: Some(20),
                notes: Some("Asked for asset tag".to_string()),
                comment: Some("ignored".to_string()),
                ..TicketEdit::default()
            },
        );
        assert_eq!(
            plan,
            UpdatePlan::Update(TicketUpdate {
                status: TicketStatus::WaitingUser,
                assigned_to: Some(20),
                notes: Some("Asked for asset tag".to_string()),
            })
        );
    }
}
