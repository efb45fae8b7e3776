use actix_session::Session;

use crate::errors::AppError;

pub fn get_member_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

pub fn get_username(session: &Session) -> Result<String, String> {
    match session.get::<String>("username") {
        Ok(Some(username)) => Ok(username),
        Ok(None) => Err("No username in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

pub fn is_admin(session: &Session) -> bool {
    session.get::<bool>("is_admin").unwrap_or(None).unwrap_or(false)
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}

/// Resolve the authenticated member id, or reject the operation.
pub fn require_member(session: &Session) -> Result<i64, AppError> {
    get_member_id(session).ok_or_else(|| AppError::Session("Not logged in".to_string()))
}

/// Check the admin flag; returns Err(AppError) if denied.
pub fn require_admin(session: &Session) -> Result<i64, AppError> {
    let member_id = require_member(session)?;
    if is_admin(session) {
        Ok(member_id)
    } else {
        Err(AppError::Forbidden("Administrator access required".to_string()))
    }
}
