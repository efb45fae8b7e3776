use askama::Template;

use super::PageContext;
use crate::models::pulse::PulseForm;

/// Member hub landing page with the feedback composer. The pulse panel has
/// three states: no active form, already submitted, or open.
#[derive(Template)]
#[template(path = "hub/index.html")]
pub struct HubTemplate {
    pub ctx: PageContext,
    pub has_active_pulse: bool,
    pub already_submitted: bool,
    pub errors: Vec<String>,
}

/// The weekly pulse page: active form, "already submitted" notice, or
/// "no active form" notice.
#[derive(Template)]
#[template(path = "hub/pulse.html")]
pub struct PulseTemplate {
    pub ctx: PageContext,
    pub form: Option<PulseForm>,
    pub already_submitted: bool,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PageContext {
        PageContext {
            username: "astrid".to_string(),
            avatar_initial: "A".to_string(),
            is_admin: false,
            flash: None,
            app_name: "PulseHub".to_string(),
            csrf_token: "test-token".to_string(),
        }
    }

    fn landing(has_active_pulse: bool, already_submitted: bool) -> String {
        HubTemplate {
            ctx: ctx(),
            has_active_pulse,
            already_submitted,
            errors: vec![],
        }
        .render()
        .unwrap()
    }

    #[test]
    fn landing_without_active_pulse_says_check_back() {
        let html = landing(false, false);
        assert!(html.contains("No active pulse form this week"));
        assert!(!html.contains("Take it now"));
    }

    #[test]
    fn landing_with_open_pulse_links_to_it() {
        let html = landing(true, false);
        assert!(html.contains("Take it now"));
        assert!(html.contains("/hub/pulse"));
    }

    #[test]
    fn landing_after_submission_drops_the_take_link() {
        let html = landing(true, true);
        assert!(html.contains("already submitted this week's pulse"));
        assert!(!html.contains("Take it now"));
    }
}
