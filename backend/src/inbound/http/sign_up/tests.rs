//! Handler tests driven through a mocked sign-up command.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::ports::MockSignUpCommand;
use crate::domain::{
    CredentialField, CredentialIssue, CredentialIssueKind, SessionCookieSettings, SessionId,
    SignUpConflict,
};
use crate::inbound::http::error::json_error_handler;

fn settings() -> SessionCookieSettings {
    SessionCookieSettings {
        name: "auth_session".to_owned(),
        secure: true,
        same_site: SameSitePolicy::Lax,
        ttl: Duration::from_secs(3600),
    }
}

async fn post_signup(
    command: MockSignUpCommand,
    body: serde_json::Value,
) -> actix_web::dev::ServiceResponse {
    let state = web::Data::new(HttpState::new(Arc::new(command)));
    let app = actix_test::init_service(
        App::new()
            .app_data(state)
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(web::scope("/api/v1").service(sign_up)),
    )
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/signup")
        .set_json(body)
        .to_request();
    actix_test::call_service(&app, request).await
}

fn command_returning(outcome: SignUpOutcome) -> MockSignUpCommand {
    let mut command = MockSignUpCommand::new();
    command
        .expect_sign_up()
        .times(1)
        .return_once(move |_| outcome);
    command
}

fn successful_outcome() -> SignUpOutcome {
    let cookie = settings().cookie_for(&SessionId::from_stored("abc123"));
    SignUpOutcome::Success(crate::domain::SignUpRedirect::new(cookie))
}

#[rstest]
#[actix_web::test]
async fn success_redirects_home_with_one_cookie() {
    let response = post_signup(
        command_returning(successful_outcome()),
        json!({"username": "bob1", "email": "bob@x.com", "password": "longenough"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/")
    );
    let cookies: Vec<_> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .filter_map(|v| v.to_str().ok())
        .map(str::to_owned)
        .collect();
    assert_eq!(cookies.len(), 1);
    let cookie = &cookies[0];
    assert!(cookie.starts_with("auth_session=abc123"));
    for attribute in ["HttpOnly", "Secure", "SameSite=Lax", "Path=/", "Max-Age=3600"] {
        assert!(cookie.contains(attribute), "missing {attribute} in {cookie}");
    }
}

#[rstest]
#[actix_web::test]
async fn form_fields_are_passed_through_untrimmed() {
    let mut command = MockSignUpCommand::new();
    command
        .expect_sign_up()
        .withf(|request| {
            request.username == " bob1 "
                && request.email == "bob@x.com"
                && request.password.as_str() == "longenough "
        })
        .times(1)
        .return_once(|_| SignUpOutcome::UnexpectedFailure);

    let response = post_signup(
        command,
        json!({"username": " bob1 ", "email": "bob@x.com", "password": "longenough "}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[rstest]
#[case(
    SignUpOutcome::ValidationFailure(CredentialIssue::new(CredentialField::Password, CredentialIssueKind::TooShort)),
    StatusCode::BAD_REQUEST,
    "Password must be at least 8 characters"
)]
#[case(
    SignUpOutcome::ConflictFailure(SignUpConflict::UsernameTaken),
    StatusCode::CONFLICT,
    "Username is already taken. Please choose a different one."
)]
#[case(
    SignUpOutcome::ConflictFailure(SignUpConflict::EmailTaken),
    StatusCode::CONFLICT,
    "User with this email already exists. Please log in."
)]
#[case(
    SignUpOutcome::UnexpectedFailure,
    StatusCode::INTERNAL_SERVER_ERROR,
    "Something went wrong! Please try again."
)]
#[actix_web::test]
async fn failures_render_error_bodies(
    #[case] outcome: SignUpOutcome,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let response = post_signup(
        command_returning(outcome),
        json!({"username": "bob1", "email": "bob@x.com", "password": "longenough"}),
    )
    .await;

    assert_eq!(response.status(), status);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body: SignUpErrorBody = actix_test::read_body_json(response).await;
    assert_eq!(body.error, message);
}

#[rstest]
#[actix_web::test]
async fn missing_fields_reach_validation_as_empty_strings() {
    let mut command = MockSignUpCommand::new();
    command
        .expect_sign_up()
        .withf(|request| request.email.is_empty() && request.username == "bob1")
        .times(1)
        .return_once(|_| {
            SignUpOutcome::ValidationFailure(CredentialIssue::new(
                CredentialField::Email,
                CredentialIssueKind::Required,
            ))
        });

    let response = post_signup(command, json!({"username": "bob1", "password": "x"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: SignUpErrorBody = actix_test::read_body_json(response).await;
    assert_eq!(body.error, "Email is required");
}

#[rstest]
#[actix_web::test]
async fn non_object_bodies_never_reach_the_command() {
    // No expectation: any call panics.
    let response = post_signup(MockSignUpCommand::new(), json!("bob1")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: crate::domain::Error = actix_test::read_body_json(response).await;
    assert_eq!(payload.code(), crate::domain::ErrorCode::InvalidRequest);
}
