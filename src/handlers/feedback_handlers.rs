use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::require_member;
use crate::auth::validate::{validate_optional, validate_required};
use crate::errors::{AppError, render};
use crate::models::{feedback, pulse};
use crate::models::feedback::FeedbackForm;
use crate::templates_structs::{HubTemplate, PageContext};

/// POST /hub/feedback
/// Files a feedback item from the hub composer. The anonymous checkbox
/// drops the member reference before anything is stored.
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<FeedbackForm>,
) -> Result<HttpResponse, AppError> {
    let member_id = require_member(&session)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut errors = Vec::new();
    if let Some(e) = validate_required(&form.content, "Feedback", 2000) {
        errors.push(e);
    }
    if let Some(e) = validate_optional(&form.category, "Category", 50) {
        errors.push(e);
    }

    if !errors.is_empty() {
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
            errors,
        };
        return render(tmpl);
    }

    let is_anonymous = form.anonymous.is_some();
    feedback::create(
        &pool,
        form.content.trim(),
        form.category.trim(),
        "suggestion",
        Some(member_id),
        is_anonymous,
    )
    .await?;

    let _ = session.insert("flash", "Feedback submitted. Thank you!");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/hub"))
        .finish())
}
