use std::collections::HashMap;

use sqlx::PgPool;
use sqlx::types::Json;

use crate::errors::AppError;

use super::types::*;

/// Publish a new pulse form and make it the single active one.
///
/// Deactivating the previous active form and inserting the new one happen
/// inside one transaction, so a partial state (old form deactivated, new
/// form missing) cannot be committed. The partial unique index on
/// pulse_forms backs the same invariant at the schema level.
pub async fn create_form(
    pool: &PgPool,
    week_label: &str,
    questions: Vec<Question>,
) -> Result<PulseForm, AppError> {
    if questions.is_empty() {
        return Err(AppError::Validation(
            "A pulse form needs at least one question".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE pulse_forms SET is_active = FALSE WHERE is_active")
        .execute(&mut *tx)
        .await?;

    let form = sqlx::query_as::<_, PulseForm>(
        "INSERT INTO pulse_forms (week_label, questions, is_active) \
         VALUES ($1, $2, TRUE) \
         RETURNING id, week_label, questions, is_active, created_at",
    )
    .bind(week_label)
    .bind(Json(questions))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(form)
}

/// The single form currently open for submissions, if any.
pub async fn get_active_form(pool: &PgPool) -> Result<Option<PulseForm>, AppError> {
    let form = sqlx::query_as::<_, PulseForm>(
        "SELECT id, week_label, questions, is_active, created_at \
         FROM pulse_forms WHERE is_active",
    )
    .fetch_optional(pool)
    .await?;
    Ok(form)
}

pub async fn get_form(pool: &PgPool, id: i64) -> Result<Option<PulseForm>, AppError> {
    let form = sqlx::query_as::<_, PulseForm>(
        "SELECT id, week_label, questions, is_active, created_at \
         FROM pulse_forms WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(form)
}

/// Cheap pre-check used to decide whether to render the submission form.
/// The UNIQUE (form_id, member_id) constraint is the authoritative guard.
pub async fn has_submitted(pool: &PgPool, form_id: i64, member_id: i64) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM pulse_responses WHERE form_id = $1 AND member_id = $2)",
    )
    .bind(form_id)
    .bind(member_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Record a member's one-time response to a form.
///
/// Raw answers are validated against the form's question list before any
/// write: every question answered, every value shaped by its question's
/// kind, unknown ids rejected. A concurrent duplicate that slips past the
/// has_submitted pre-check is caught by the unique constraint and surfaced
/// as a Conflict so the caller can say "already responded".
pub async fn submit_response(
    pool: &PgPool,
    form_id: i64,
    member_id: i64,
    raw_answers: &HashMap<String, String>,
    comment: Option<&str>,
) -> Result<PulseResponse, AppError> {
    let form = get_form(pool, form_id).await?.ok_or(AppError::NotFound)?;

    let answers = validate_answers(form.question_list(), raw_answers)
        .map_err(|errors| AppError::Validation(errors.join("; ")))?;

    let comment = comment.map(str::trim).filter(|c| !c.is_empty());

    let result = sqlx::query_as::<_, PulseResponse>(
        "INSERT INTO pulse_responses (form_id, member_id, answers, comment) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, form_id, member_id, answers, comment, created_at",
    )
    .bind(form_id)
    .bind(member_id)
    .bind(Json(answers))
    .bind(comment)
    .fetch_one(pool)
    .await;

    match result {
        Ok(response) => Ok(response),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            "You have already submitted this pulse".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// All responses to a form for administrator review, newest first.
/// Answers are flattened into display lines in the form's question order.
pub async fn list_responses(
    pool: &PgPool,
    form_id: i64,
) -> Result<Vec<PulseResponseView>, AppError> {
    let form = get_form(pool, form_id).await?.ok_or(AppError::NotFound)?;

    #[derive(sqlx::FromRow)]
    struct Row {
        id: i64,
        member_name: String,
        answers: Json<HashMap<String, AnswerValue>>,
        comment: Option<String>,
        created_at: chrono::DateTime<chrono::Utc>,
    }

    let rows = sqlx::query_as::<_, Row>(
        "SELECT r.id, \
                COALESCE(NULLIF(m.display_name, ''), m.username) AS member_name, \
                r.answers, r.comment, r.created_at \
         FROM pulse_responses r \
         JOIN members m ON m.id = r.member_id \
         WHERE r.form_id = $1 \
         ORDER BY r.created_at DESC, r.id DESC",
    )
    .bind(form_id)
    .fetch_all(pool)
    .await?;

    let views = rows
        .into_iter()
        .map(|row| {
            let answers = form
                .question_list()
                .iter()
                .map(|q| AnswerLine {
                    prompt: q.prompt.clone(),
                    value: row
                        .answers
                        .get(&q.id)
                        .map(AnswerValue::display)
                        .unwrap_or_default(),
                })
                .collect();
            PulseResponseView {
                id: row.id,
                member_name: row.member_name,
                answers,
                comment: row.comment,
                created_at: row.created_at,
            }
        })
        .collect();

    Ok(views)
}
