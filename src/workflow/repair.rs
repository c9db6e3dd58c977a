use tracing::{debug, warn};

use crate::context::AppContext;
use crate::domain::repair::RepairForm;
use crate::domain::ticket::Ticket;
use crate::error::AppResult;
use crate::services::HelpdeskService;
use crate::workflow::liff::{self, LiffState};

/// Backend account used when the requester cannot be matched to a user.
pub const DEMO_USER_ID: u64 = 1;

#[derive(Debug, Clone)]
pub struct Requester {
    pub line_id: Option<String>,
    pub user_id: u64,
    pub liff: LiffState,
}

pub struct RepairOutcome {
    pub ticket: Ticket,
    pub requester: Requester,
}

/// Identifies the requester from the LINE session, falling back to the
/// `lineId` query parameter of the page URL.
pub async fn identify(ctx: &AppContext, page_url: Option<&str>) -> Requester {
    let state = liff::initialize(ctx.messaging.as_deref(), &ctx.config.liff_id, page_url).await;
    let line_id = state
        .context
        .as_ref()
        .map(|context| context.user_id.clone())
        .or_else(|| page_url.and_then(liff::line_id_from_url));
    let user_id = resolve_user_id(ctx.helpdesk.as_ref(), line_id.as_deref()).await;

    Requester {
        line_id,
        user_id,
        liff: state,
    }
}

pub async fn resolve_user_id(helpdesk: &dyn HelpdeskService, line_id: Option<&str>) -> u64 {
    let Some(line_id) = line_id else {
        return DEMO_USER_ID;
    };
    match helpdesk.linked_user(line_id).await {
        Ok(Some(user_id)) => user_id,
        Ok(None) => {
            debug!(line_id, "LINE account not linked, using demo user");
            DEMO_USER_ID
        }
        Err(err) => {
            warn!(line_id, error = %err, "failed to resolve linked user, using demo user");
            DEMO_USER_ID
        }
    }
}

pub async fn submit_repair_request(
    ctx: &AppContext,
    form: RepairForm,
    page_url: Option<&str>,
) -> AppResult<RepairOutcome> {
    form.validate().into_result()?;

    let requester = identify(ctx, page_url).await;
    let submission = form.into_submission(requester.user_id);
    let ticket = ctx.helpdesk.submit_repair(&submission).await?;

    if requester.line_id.is_some() {
        liff::close_window(ctx.messaging.as_deref());
    }

    Ok(RepairOutcome { ticket, requester })
}

pub async fn repair_status(
    ctx: &AppContext,
    page_url: Option<&str>,
) -> AppResult<(Requester, Vec<Ticket>)> {
    let requester = identify(ctx, page_url).await;
    let tickets = ctx.helpdesk.tickets_for_user(requester.user_id).await?;
    Ok((requester, tickets))
}
