use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::require_member;
use crate::errors::{AppError, render};
use crate::models::pulse;
use crate::templates_structs::{HubTemplate, PageContext};

/// GET /hub
/// Member hub landing: pulse state notice (none / already submitted / open)
/// plus the feedback composer.
pub async fn index(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    let member_id = require_member(&session)?;
    let ctx = PageContext::build(&session)?;

    let active = pulse::get_active_form(&pool).await?;
    let already_submitted = match &active {
        Some(f) => pulse::has_submitted(&pool, f.id, member_id).await?,
        None => false,
    };

    let tmpl = HubTemplate {
        ctx,
        has_active_pulse: active.is_some(),
        already_submitted,
        errors: vec![],
    };
    render(tmpl)
}
