use askama::Template;

use super::PageContext;
use crate::models::member::MemberDisplay;
use crate::models::pulse::{PulseForm, PulseResponseView};

/// The pulse form builder.
#[derive(Template)]
#[template(path = "admin/pulse_builder.html")]
pub struct PulseBuilderTemplate {
    pub ctx: PageContext,
    pub week_label: String,
    pub errors: Vec<String>,
}

/// Responses to the active pulse form.
#[derive(Template)]
#[template(path = "admin/responses.html")]
pub struct ResponsesTemplate {
    pub ctx: PageContext,
    pub form: Option<PulseForm>,
    pub responses: Vec<PulseResponseView>,
}

/// One row of the aggregator table, flattened from the snapshot view.
pub struct FeedbackRow {
    pub submitted_on: String,
    pub category: String,
    pub content: String,
    pub member_ref: String,
}

/// The feedback aggregator: filter by category, sort by date.
#[derive(Template)]
#[template(path = "admin/aggregator.html")]
pub struct AggregatorTemplate {
    pub ctx: PageContext,
    pub rows: Vec<FeedbackRow>,
    pub categories: Vec<String>,
    pub active_category: String,
    pub sort_order: String,
    pub toggled_order: String,
}

/// Member directory with the creation form.
#[derive(Template)]
#[template(path = "admin/members.html")]
pub struct MemberListTemplate {
    pub ctx: PageContext,
    pub members: Vec<MemberDisplay>,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PageContext {
        PageContext {
            username: "board".to_string(),
            avatar_initial: "B".to_string(),
            is_admin: true,
            flash: None,
            app_name: "PulseHub".to_string(),
            csrf_token: "test-token".to_string(),
        }
    }

    #[test]
    fn aggregator_links_percent_encode_category_values() {
        let html = AggregatorTemplate {
            ctx: ctx(),
            rows: vec![],
            categories: vec!["All".to_string(), "R&D #hiring".to_string()],
            active_category: "Q&A".to_string(),
            sort_order: "desc".to_string(),
            toggled_order: "asc".to_string(),
        }
        .render()
        .unwrap();

        // Filter pills and the sort toggle must survive '&' and '#' in the
        // category query value.
        assert!(html.contains("category=R%26D%20%23hiring&amp;sort=desc"));
        assert!(html.contains("category=Q%26A&amp;sort=asc"));
        // The visible label stays human-readable (HTML-escaped only).
        assert!(html.contains(">R&amp;D #hiring</a>"));
    }
}
