use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{csrf, password, rate_limit::RateLimiter};
use crate::errors::{AppError, render};
use crate::models::member;
use crate::templates_structs::{APP_NAME, LoginTemplate};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    // If already logged in, redirect to the hub
    if session.get::<i64>("user_id").unwrap_or(None).is_some() {
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/hub"))
            .finish());
    }

    let csrf_token = csrf::get_or_create_token(&session);
    let tmpl = LoginTemplate {
        error: None,
        app_name: APP_NAME.to_string(),
        csrf_token,
    };
    render(tmpl)
}

pub async fn login_submit(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Rate-limit check BEFORE any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        let csrf_token = csrf::get_or_create_token(&session);
        let tmpl = LoginTemplate {
            error: Some("Too many failed login attempts. Please try again later.".to_string()),
            app_name: APP_NAME.to_string(),
            csrf_token,
        };
        return render(tmpl);
    }

    let found = member::find_by_username(&pool, &form.username).await?;

    match found {
        Some(m) if password::verify_password(&form.password, &m.password).unwrap_or(false) => {
            limiter.clear(ip);

            let _ = session.insert("user_id", m.id);
            let _ = session.insert("username", &m.username);
            let _ = session.insert("is_admin", m.is_admin);
            Ok(HttpResponse::SeeOther()
                .insert_header(("Location", "/hub"))
                .finish())
        }
        _ => {
            limiter.record_failure(ip);
            let csrf_token = csrf::get_or_create_token(&session);
            let tmpl = LoginTemplate {
                error: Some("Invalid username or password".to_string()),
                app_name: APP_NAME.to_string(),
                csrf_token,
            };
            render(tmpl)
        }
    }
}

pub async fn logout(session: Session, form: web::Form<CsrfOnly>) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/login"))
        .finish())
}
