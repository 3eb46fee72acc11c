//! Regression coverage for credential validation.

use super::*;
use rstest::rstest;

const VALID_USERNAME: &str = "bob1";
const VALID_EMAIL: &str = "bob@x.com";
const VALID_PASSWORD: &str = "longenough";

fn sign_up_error(username: &str, email: &str, password: &str) -> CredentialsValidationError {
    SignUpCredentials::try_from_parts(username, email, password)
        .expect_err("invalid inputs must fail")
}

#[rstest]
fn valid_sign_up_fields_are_trimmed() {
    let creds = SignUpCredentials::try_from_parts("  bob1 ", " bob@x.com\t", " longenough ")
        .expect("valid inputs should succeed");

    assert_eq!(creds.username().as_ref(), "bob1");
    assert_eq!(creds.email().as_ref(), "bob@x.com");
    assert_eq!(creds.password().expose(), "longenough");
}

#[rstest]
#[case("bob smith", "Only letters, numbers, _ and - allowed")]
#[case("bob!", "Only letters, numbers, _ and - allowed")]
#[case("", "Username is required")]
#[case("   ", "Username is required")]
fn invalid_usernames_report_username_message(#[case] username: &str, #[case] message: &str) {
    let err = sign_up_error(username, VALID_EMAIL, VALID_PASSWORD);
    assert_eq!(err.first().field(), CredentialField::Username);
    assert_eq!(err.first().message(), message);
}

#[rstest]
#[case("bob.x.com", "Invalid email address")]
#[case("bob@", "Invalid email address")]
#[case("bob@x.co\u{17F}", "Invalid email address")]
#[case("", "Email is required")]
#[case(" \t ", "Email is required")]
fn invalid_emails_report_email_message(#[case] email: &str, #[case] message: &str) {
    let err = sign_up_error(VALID_USERNAME, email, VALID_PASSWORD);
    assert_eq!(err.first().field(), CredentialField::Email);
    assert_eq!(err.first().message(), message);
}

#[rstest]
#[case("short")]
#[case("1234567")]
#[case("  1234567  ")]
#[case("")]
#[case("\u{1F600}\u{1F600}\u{1F600}\u{1F600}")]
fn short_passwords_are_rejected_after_trimming(#[case] password: &str) {
    let err = sign_up_error(VALID_USERNAME, VALID_EMAIL, password);
    assert_eq!(err.first().field(), CredentialField::Password);
    assert_eq!(err.first().kind(), CredentialIssueKind::TooShort);
    assert_eq!(err.first().message(), "Password must be at least 8 characters");
}

#[rstest]
fn password_length_counts_characters_not_bytes() {
    let creds = SignUpCredentials::try_from_parts(VALID_USERNAME, VALID_EMAIL, "ééééééééé")
        .expect("nine characters satisfy the minimum");
    assert_eq!(creds.password().expose().chars().count(), 9);
    assert!(SignUpCredentials::try_from_parts(VALID_USERNAME, VALID_EMAIL, "éééé").is_err());
}

#[rstest]
fn issues_are_reported_in_field_order() {
    let err = sign_up_error("bad name", "nope", "short");
    let fields: Vec<_> = err.issues().map(CredentialIssue::field).collect();

    assert_eq!(
        fields,
        vec![
            CredentialField::Email,
            CredentialField::Username,
            CredentialField::Password,
        ]
    );
    assert_eq!(err.to_string(), "Invalid email address");
}

#[rstest]
fn username_issue_precedes_password_issue() {
    let err = sign_up_error("", VALID_EMAIL, "short");
    let codes: Vec<_> = err.issues().map(CredentialIssue::code).collect();
    assert_eq!(codes, vec!["required", "too_short"]);
}

#[rstest]
fn password_is_redacted_in_debug_output() {
    let creds = SignUpCredentials::try_from_parts(VALID_USERNAME, VALID_EMAIL, "hunter2hunter2")
        .expect("valid inputs should succeed");
    let rendered = format!("{creds:?}");
    assert!(!rendered.contains("hunter2"));
}

#[rstest]
#[case("", "longenough", &[CredentialField::Username][..])]
#[case("   ", "short", &[CredentialField::Username, CredentialField::Password][..])]
#[case("admin", "short", &[CredentialField::Password][..])]
fn invalid_login_credentials(
    #[case] username: &str,
    #[case] password: &str,
    #[case] expected: &[CredentialField],
) {
    let err = LoginCredentials::try_from_parts(username, password)
        .expect_err("invalid inputs must fail");
    let fields: Vec<_> = err.issues().map(CredentialIssue::field).collect();
    assert_eq!(fields, expected);
}

#[rstest]
fn login_usernames_only_need_to_be_present() {
    let creds = LoginCredentials::try_from_parts("  any name! ", "password123")
        .expect("login does not enforce the username character set");
    assert_eq!(creds.username(), "any name!");
    assert_eq!(creds.password().expose(), "password123");
}
