use tracing::info;

use crate::context::AppContext;
use crate::domain::user::UserForm;
use crate::error::AppResult;

pub async fn create_user(ctx: &AppContext, form: UserForm) -> AppResult<()> {
    form.validate(true).into_result()?;
    info!(email = %form.email, role = form.role.as_str(), "creating user");
    ctx.helpdesk.create_user(&form.into_payload()).await
}

/// Applies `edit` to the stored user. An empty password leaves the stored
/// one untouched.
pub async fn update_user(
    ctx: &AppContext,
    id: u64,
    edit: impl FnOnce(&mut UserForm),
) -> AppResult<UserForm> {
    let mut form = ctx.helpdesk.get_user(id).await?.to_form();
    edit(&mut form);
    form.validate(false).into_result()?;

    let payload = form.into_payload();
    info!(id, "updating user");
    ctx.helpdesk.update_user(id, &payload).await?;
    Ok(payload)
}
