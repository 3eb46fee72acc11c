//! Unit tests for session cookie configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;

fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_env_with(extra: &[(&str, &str)]) -> MockEnv {
    let mut vars = vec![(COOKIE_SECURE_ENV, "1"), (SAMESITE_ENV, "Strict")];
    vars.extend_from_slice(extra);
    mock_env(&vars)
}

#[rstest]
fn debug_defaults_are_secure_and_lax() {
    let settings = session_cookie_settings_from_env(&mock_env(&[]), BuildMode::Debug)
        .expect("debug defaults should load");

    assert_eq!(settings.name, "auth_session");
    assert!(settings.secure);
    assert_eq!(settings.same_site, SameSitePolicy::Lax);
    assert_eq!(settings.ttl, Duration::from_secs(30 * SECONDS_PER_DAY));
}

#[rstest]
#[case(&[], SessionConfigError::MissingEnv { name: COOKIE_SECURE_ENV })]
#[case(&[(COOKIE_SECURE_ENV, "1")], SessionConfigError::MissingEnv { name: SAMESITE_ENV })]
fn release_requires_explicit_toggles(
    #[case] vars: &[(&str, &str)],
    #[case] expected: SessionConfigError,
) {
    let err = session_cookie_settings_from_env(&mock_env(vars), BuildMode::Release)
        .expect_err("release build should reject missing toggles");
    assert_eq!(err, expected);
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_invalid_cookie_secure_is_rejected(#[case] value: &str) {
    let env = mock_env(&[(COOKIE_SECURE_ENV, value), (SAMESITE_ENV, "Strict")]);
    let err = session_cookie_settings_from_env(&env, BuildMode::Release)
        .expect_err("invalid boolean should fail");
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            ..
        }
    ));
}

#[rstest]
fn debug_invalid_cookie_secure_falls_back_to_secure() {
    let env = mock_env(&[(COOKIE_SECURE_ENV, "maybe")]);
    let settings =
        session_cookie_settings_from_env(&env, BuildMode::Debug).expect("debug should tolerate");
    assert!(settings.secure);
}

#[rstest]
fn release_same_site_none_requires_secure() {
    let env = mock_env(&[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")]);
    let err = session_cookie_settings_from_env(&env, BuildMode::Release)
        .expect_err("insecure SameSite=None should fail");
    assert_eq!(err, SessionConfigError::InsecureSameSiteNone);
}

#[rstest]
fn debug_same_site_none_without_secure_is_allowed() {
    let env = mock_env(&[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "none")]);
    let settings =
        session_cookie_settings_from_env(&env, BuildMode::Debug).expect("debug should warn only");
    assert!(!settings.secure);
    assert_eq!(settings.same_site, SameSitePolicy::None);
}

#[rstest]
#[case("strict", SameSitePolicy::Strict)]
#[case("LAX", SameSitePolicy::Lax)]
#[case("None", SameSitePolicy::None)]
fn same_site_is_case_insensitive(#[case] value: &str, #[case] expected: SameSitePolicy) {
    let env = mock_env(&[(COOKIE_SECURE_ENV, "1"), (SAMESITE_ENV, value)]);
    let settings =
        session_cookie_settings_from_env(&env, BuildMode::Release).expect("valid settings");
    assert_eq!(settings.same_site, expected);
}

#[rstest]
fn release_invalid_same_site_is_rejected() {
    let env = mock_env(&[(COOKIE_SECURE_ENV, "1"), (SAMESITE_ENV, "sometimes")]);
    let err = session_cookie_settings_from_env(&env, BuildMode::Release)
        .expect_err("unknown policy should fail");
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: SAMESITE_ENV,
            ..
        }
    ));
}

#[rstest]
fn cookie_name_and_ttl_overrides_apply() {
    let env = release_env_with(&[(COOKIE_NAME_ENV, "sid"), (TTL_DAYS_ENV, "7")]);

    let settings = session_cookie_settings_from_env(&env, BuildMode::Release)
        .expect("valid settings");

    assert_eq!(settings.name, "sid");
    assert_eq!(settings.ttl, Duration::from_secs(7 * SECONDS_PER_DAY));
}

#[rstest]
#[case("")]
#[case("my session")]
#[case("a=b")]
fn invalid_cookie_names_are_rejected(#[case] name: &str) {
    let env = release_env_with(&[(COOKIE_NAME_ENV, name)]);

    let err = session_cookie_settings_from_env(&env, BuildMode::Debug)
        .expect_err("bad cookie name should fail in every mode");
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: COOKIE_NAME_ENV,
            ..
        }
    ));
}

#[rstest]
#[case("0")]
#[case("3651")]
#[case("soon")]
fn invalid_ttl_is_rejected(#[case] days: &str) {
    let env = release_env_with(&[(TTL_DAYS_ENV, days)]);

    let err = session_cookie_settings_from_env(&env, BuildMode::Release)
        .expect_err("bad ttl should fail");
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: TTL_DAYS_ENV,
            ..
        }
    ));
}

#[rstest]
#[case("1", Some(true))]
#[case("Yes", Some(true))]
#[case("n", Some(false))]
#[case("FALSE", Some(false))]
#[case("perhaps", None)]
fn parse_bool_accepts_common_spellings(#[case] value: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(value), expected);
}
