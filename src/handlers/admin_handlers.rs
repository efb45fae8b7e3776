use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::require_admin;
use crate::auth::validate::{validate_email, validate_password, validate_required, validate_username};
use crate::auth::password;
use crate::errors::{AppError, render};
use crate::models::feedback::{self, FeedbackSnapshot, SortOrder};
use crate::models::member::{self, MemberForm, NewMember};
use crate::models::pulse::{self, PulseFormInput, QuestionInput, build_questions};
use crate::templates_structs::{
    AggregatorTemplate, FeedbackRow, MemberListTemplate, PageContext, PulseBuilderTemplate,
    ResponsesTemplate,
};

/// GET /admin/pulse/new
/// Renders the pulse form builder.
pub async fn builder_form(session: Session) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let ctx = PageContext::build(&session)?;

    let tmpl = PulseBuilderTemplate {
        ctx,
        week_label: String::new(),
        errors: vec![],
    };
    render(tmpl)
}

/// POST /admin/pulse
/// Publishes a new pulse form and activates it, deactivating any
/// previously active form in the same transaction.
pub async fn publish(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<PulseFormInput>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut errors = Vec::new();
    if let Some(e) = validate_required(&form.week_label, "Week label", 100) {
        errors.push(e);
    }

    let inputs: Vec<QuestionInput> = match serde_json::from_str(&form.questions) {
        Ok(inputs) => inputs,
        Err(_) => {
            errors.push("Malformed question list".to_string());
            vec![]
        }
    };

    let questions = if errors.is_empty() {
        match build_questions(&inputs) {
            Ok(questions) => questions,
            Err(mut build_errors) => {
                errors.append(&mut build_errors);
                vec![]
            }
        }
    } else {
        vec![]
    };

    if !errors.is_empty() {
        let ctx = PageContext::build(&session)?;
        let tmpl = PulseBuilderTemplate {
            ctx,
            week_label: form.week_label.clone(),
            errors,
        };
        return render(tmpl);
    }

    let published = pulse::create_form(&pool, form.week_label.trim(), questions).await?;
    log::info!("Published pulse form #{} ({})", published.id, published.week_label);

    let _ = session.insert("flash", "Pulse form published. Members will see it in their Hub.");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/admin/pulse/responses"))
        .finish())
}

/// GET /admin/pulse/responses
/// Responses to the active pulse form, newest first.
pub async fn responses(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let ctx = PageContext::build(&session)?;

    let form = pulse::get_active_form(&pool).await?;
    let responses = match &form {
        Some(f) => pulse::list_responses(&pool, f.id).await?,
        None => vec![],
    };

    let tmpl = ResponsesTemplate {
        ctx,
        form,
        responses,
    };
    render(tmpl)
}

#[derive(Deserialize)]
pub struct AggregatorQuery {
    category: Option<String>,
    sort: Option<String>,
}

/// GET /admin/feedback?category=...&sort=asc|desc
/// The feedback aggregator. The snapshot is loaded once per request and
/// every filter/sort combination is derived from it in memory.
pub async fn aggregator(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<AggregatorQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let ctx = PageContext::build(&session)?;

    let snapshot = FeedbackSnapshot::new(feedback::find_all(&pool).await?);
    let active_category = query.category.clone().unwrap_or_else(|| "All".to_string());
    let order = SortOrder::from_param(query.sort.as_deref().unwrap_or("desc"));

    let rows = snapshot
        .view(&active_category, order)
        .into_iter()
        .map(|item| FeedbackRow {
            submitted_on: item.submitted_on(),
            category: item.category.clone(),
            content: item.content.clone(),
            member_ref: item.member_ref(),
        })
        .collect();

    let tmpl = AggregatorTemplate {
        ctx,
        rows,
        categories: snapshot.categories(),
        active_category,
        sort_order: order.as_str().to_string(),
        toggled_order: order.toggled().as_str().to_string(),
    };
    render(tmpl)
}

/// GET /admin/members
pub async fn member_list(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let ctx = PageContext::build(&session)?;
    let members = member::find_all(&pool).await?;

    let tmpl = MemberListTemplate {
        ctx,
        members,
        errors: vec![],
    };
    render(tmpl)
}

/// POST /admin/members
pub async fn member_create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<MemberForm>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut errors = Vec::new();
    if let Some(e) = validate_username(&form.username) {
        errors.push(e);
    }
    if let Some(e) = validate_email(&form.email) {
        errors.push(e);
    }
    if let Some(e) = validate_password(&form.password) {
        errors.push(e);
    }

    if errors.is_empty() {
        let hash = password::hash_password(&form.password).map_err(AppError::Hash)?;
        let result = member::create(
            &pool,
            &NewMember {
                username: form.username.trim().to_string(),
                password: hash,
                email: form.email.trim().to_string(),
                display_name: form.display_name.trim().to_string(),
                is_admin: form.is_admin.is_some(),
            },
        )
        .await;
        match result {
            Ok(_) => {
                let _ = session.insert("flash", "Member account created");
                return Ok(HttpResponse::SeeOther()
                    .insert_header(("Location", "/admin/members"))
                    .finish());
            }
            Err(AppError::Conflict(msg)) => errors.push(msg),
            Err(e) => return Err(e),
        }
    }

    let ctx = PageContext::build(&session)?;
    let members = member::find_all(&pool).await?;
    let tmpl = MemberListTemplate {
        ctx,
        members,
        errors,
    };
    render(tmpl)
}
