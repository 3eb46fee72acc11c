//! Sign-up endpoint.
//!
//! ```text
//! POST /api/v1/signup {"username":"bob1","email":"bob@x.com","password":"longenough"}
//! ```
//!
//! Success answers `303 See Other` to `/` with the session cookie set.
//! Failures answer `{"error": "<message>"}` with 400, 409 or 500.

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::http::header;
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SignUpRequest;
use crate::domain::{SameSitePolicy, SessionCookie, SignUpOutcome};
use crate::inbound::http::state::HttpState;

/// Sign-up form. Absent fields read as empty so they fail validation with
/// the field's own message.
#[derive(Deserialize, ToSchema)]
pub struct SignUpRequestBody {
    #[serde(default)]
    #[schema(example = "bob1")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "bob@x.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "longenough", format = Password)]
    pub password: String,
}

/// Failure body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignUpErrorBody {
    #[schema(example = "Username is already taken. Please choose a different one.")]
    pub error: String,
}

/// Register an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignUpRequestBody,
    responses(
        (
            status = 303,
            description = "Account created and session opened",
            headers(
                ("Location" = String, description = "Always `/`"),
                ("Set-Cookie" = String, description = "Session cookie")
            )
        ),
        (status = 400, description = "A field failed validation", body = SignUpErrorBody),
        (status = 409, description = "Username or email already registered", body = SignUpErrorBody),
        (status = 500, description = "Unexpected failure", body = SignUpErrorBody)
    ),
    tags = ["auth"],
    operation_id = "signUp",
    security([])
)]
#[post("/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpRequestBody>,
) -> HttpResponse {
    let SignUpRequestBody {
        username,
        email,
        password,
    } = payload.into_inner();
    let outcome = state
        .sign_up
        .sign_up(SignUpRequest::new(username, email, password))
        .await;
    outcome_response(&outcome)
}

fn outcome_response(outcome: &SignUpOutcome) -> HttpResponse {
    let mut builder = match outcome {
        SignUpOutcome::Success(redirect) => {
            return HttpResponse::SeeOther()
                .insert_header((header::LOCATION, redirect.location()))
                .insert_header((header::CACHE_CONTROL, "no-store"))
                .cookie(to_actix_cookie(redirect.session_cookie()))
                .finish();
        }
        SignUpOutcome::ValidationFailure(_) => HttpResponse::BadRequest(),
        SignUpOutcome::ConflictFailure(_) => HttpResponse::Conflict(),
        SignUpOutcome::UnexpectedFailure => HttpResponse::InternalServerError(),
    };
    let error = outcome.error_message().unwrap_or_default().to_owned();
    builder.json(SignUpErrorBody { error })
}

/// Render the issuer's cookie without altering any attribute.
fn to_actix_cookie(cookie: &SessionCookie) -> Cookie<'static> {
    let attributes = cookie.attributes();
    let same_site = match attributes.same_site {
        SameSitePolicy::Strict => SameSite::Strict,
        SameSitePolicy::Lax => SameSite::Lax,
        SameSitePolicy::None => SameSite::None,
    };
    let mut built = Cookie::build(cookie.name().to_owned(), cookie.value().to_owned())
        .path(attributes.path.clone())
        .http_only(attributes.http_only)
        .secure(attributes.secure)
        .same_site(same_site)
        .finish();
    if let Some(seconds) = attributes.max_age_secs {
        built.set_max_age(CookieDuration::seconds(seconds));
    }
    built
}

#[cfg(test)]
mod tests;
