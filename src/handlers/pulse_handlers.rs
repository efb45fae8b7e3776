use std::collections::HashMap;

use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::require_member;
use crate::errors::{AppError, render};
use crate::models::pulse;
use crate::templates_structs::{PageContext, PulseTemplate};

const ANSWER_PREFIX: &str = "answer_";

/// GET /hub/pulse
/// Shows the active form, an "already submitted" notice, or a "no active
/// form" notice. The has_submitted pre-check here is a UX convenience; the
/// unique constraint on submission is the correctness mechanism.
pub async fn show(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    let member_id = require_member(&session)?;
    let ctx = PageContext::build(&session)?;

    let form = pulse::get_active_form(&pool).await?;
    let already_submitted = match &form {
        Some(f) => pulse::has_submitted(&pool, f.id, member_id).await?,
        None => false,
    };

    let tmpl = PulseTemplate {
        ctx,
        form,
        already_submitted,
        errors: vec![],
    };
    render(tmpl)
}

/// POST /hub/pulse
/// Records the member's one-time response to the active form. Answer
/// fields are named `answer_<question id>`.
pub async fn submit(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let member_id = require_member(&session)?;
    let csrf_token = form.get("csrf_token").map(|s| s.as_str()).unwrap_or("");
    csrf::validate_csrf(&session, csrf_token)?;

    let Some(active) = pulse::get_active_form(&pool).await? else {
        let _ = session.insert("flash", "There is no active pulse form right now");
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/hub/pulse"))
            .finish());
    };

    let raw_answers: HashMap<String, String> = form
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(ANSWER_PREFIX)
                .map(|id| (id.to_string(), value.clone()))
        })
        .collect();
    let comment = form.get("comment").map(|s| s.as_str());

    match pulse::submit_response(&pool, active.id, member_id, &raw_answers, comment).await {
        Ok(_) => {
            let _ = session.insert("flash", "Pulse sent. Your feedback reaches the board directly.");
            Ok(HttpResponse::SeeOther()
                .insert_header(("Location", "/hub/pulse"))
                .finish())
        }
        Err(AppError::Validation(msg)) => {
            // Re-render the form with every validation message.
            let ctx = PageContext::build(&session)?;
            let tmpl = PulseTemplate {
                ctx,
                form: Some(active),
                already_submitted: false,
                errors: msg.split("; ").map(String::from).collect(),
            };
            render(tmpl)
        }
        Err(AppError::Conflict(_)) => {
            // Lost the race against our own pre-check; treat as submitted.
            let _ = session.insert("flash", "You have already submitted this pulse");
            Ok(HttpResponse::SeeOther()
                .insert_header(("Location", "/hub/pulse"))
                .finish())
        }
        Err(e) => Err(e),
    }
}
