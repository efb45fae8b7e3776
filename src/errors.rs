use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Template(askama::Error),
    Session(String),
    Forbidden(String),
    Conflict(String),
    Validation(String),
    Hash(String),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Forbidden(e) => write!(f, "Forbidden: {e}"),
            AppError::Conflict(e) => write!(f, "Conflict: {e}"),
            AppError::Validation(e) => write!(f, "Validation error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().body("Not Found"),
            AppError::Session(_) => HttpResponse::SeeOther()
                .insert_header(("Location", "/login"))
                .finish(),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().body(msg.clone()),
            AppError::Conflict(msg) => HttpResponse::Conflict().body(msg.clone()),
            AppError::Validation(msg) => HttpResponse::BadRequest().body(msg.clone()),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render an Askama template into a 200 HTML response.
pub fn render<T: Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}
