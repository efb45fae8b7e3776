use sqlx::PgPool;

use crate::errors::AppError;

use super::types::FeedbackItem;

/// File a new feedback item. Returns the new row id.
///
/// Blank category falls back to "General", blank kind to "suggestion".
/// Anonymous submissions store NULL for the member reference; the
/// association is absent from storage, not just hidden at display time.
pub async fn create(
    pool: &PgPool,
    content: &str,
    category: &str,
    kind: &str,
    member_id: Option<i64>,
    is_anonymous: bool,
) -> Result<i64, AppError> {
    let category = match category.trim() {
        "" => "General",
        c => c,
    };
    let kind = match kind.trim() {
        "" => "suggestion",
        k => k,
    };
    let member_id = if is_anonymous { None } else { member_id };

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO feedback (content, category, kind, member_id, is_anonymous) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id",
    )
    .bind(content)
    .bind(category)
    .bind(kind)
    .bind(member_id)
    .bind(is_anonymous)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Full feedback snapshot, newest first. Filtering and re-sorting happen
/// in memory on this snapshot, not with a query per filter change.
pub async fn find_all(pool: &PgPool) -> Result<Vec<FeedbackItem>, AppError> {
    let items = sqlx::query_as::<_, FeedbackItem>(
        "SELECT id, content, category, kind, member_id, is_anonymous, created_at \
         FROM feedback \
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(items)
}
