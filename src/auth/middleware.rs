use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

/// Gate for the authenticated scope. Requests without a logged-in member in
/// the session get bounced to /login; handlers behind this never see an
/// anonymous request.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let logged_in = req
        .get_session()
        .get::<i64>("user_id")
        .unwrap_or(None)
        .is_some();

    if !logged_in {
        let redirect = HttpResponse::SeeOther()
            .insert_header(("Location", "/login"))
            .finish();
        return Ok(req.into_response(redirect).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}
