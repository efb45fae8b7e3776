// Template context structures for Askama templates, organized by domain.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{get_username, is_admin, take_flash};
use crate::errors::AppError;

pub const APP_NAME: &str = "PulseHub";

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.username`, `ctx.is_admin`, etc.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub is_admin: bool,
    pub flash: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
}

impl PageContext {
    pub fn build(session: &Session) -> Result<Self, AppError> {
        let username = get_username(session)
            .map_err(|e| AppError::Session(format!("Failed to get username: {}", e)))?;
        let is_admin = is_admin(session);
        let flash = take_flash(session);
        let csrf_token = csrf::get_or_create_token(session);
        let avatar_initial = username.chars().next().unwrap_or('?').to_uppercase().to_string();
        Ok(Self {
            username,
            avatar_initial,
            is_admin,
            flash,
            app_name: APP_NAME.to_string(),
            csrf_token,
        })
    }
}

mod admin;
mod common;
mod hub;

pub use self::admin::{AggregatorTemplate, FeedbackRow, MemberListTemplate, PulseBuilderTemplate, ResponsesTemplate};
pub use self::common::LoginTemplate;
pub use self::hub::{HubTemplate, PulseTemplate};
