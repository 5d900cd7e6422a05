use super::*;
use serde_json::json;

const USER_ID: &str = "8d0fd2b3-9ca7-4d9e-a95f-9e13dded323e";

fn user_json() -> serde_json::Value {
    json!({
        "id": USER_ID,
        "aud": "authenticated",
        "role": "authenticated",
        "email": "ada@example.com",
        "email_confirmed_at": "2024-01-01T00:00:00Z",
        "created_at": "2024-01-01T00:00:00Z",
        "app_metadata": {"provider": "email"}
    })
}

// =============================================================================
// api_error_message
// =============================================================================

#[test]
fn error_message_prefers_msg() {
    let body = r#"{"code":400,"msg":"Invalid login credentials","error_code":"invalid_credentials"}"#;
    assert_eq!(api_error_message(body), "Invalid login credentials");
}

#[test]
fn error_message_reads_data_api_message() {
    let body = r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public._realtime_subscription\" does not exist"}"#;
    assert_eq!(api_error_message(body), "relation \"public._realtime_subscription\" does not exist");
}

#[test]
fn error_message_reads_oauth_style_body() {
    let body = r#"{"error":"invalid_grant","error_description":"Invalid Refresh Token: Refresh Token Not Found"}"#;
    assert_eq!(api_error_message(body), "Invalid Refresh Token: Refresh Token Not Found");
}

#[test]
fn error_message_skips_empty_fields() {
    let body = r#"{"msg":"","error":"unauthorized"}"#;
    assert_eq!(api_error_message(body), "unauthorized");
}

#[test]
fn error_message_falls_back_to_raw_text() {
    assert_eq!(api_error_message("  Bad Gateway \n"), "Bad Gateway");
    assert_eq!(api_error_message(""), "unknown error");
}

#[test]
fn api_error_displays_bare_message() {
    let err = SupabaseError::Api { status: 404, message: "not found".into() };
    assert_eq!(err.to_string(), "not found");
    assert!(err.is_api());
    assert!(!err.is_unauthorized());
}

#[test]
fn retryable_covers_transport_rate_limit_and_5xx() {
    assert!(SupabaseError::Request("timeout".into()).is_retryable());
    assert!(SupabaseError::Api { status: 429, message: String::new() }.is_retryable());
    assert!(SupabaseError::Api { status: 503, message: String::new() }.is_retryable());
    assert!(!SupabaseError::Api { status: 400, message: String::new() }.is_retryable());
    assert!(!SupabaseError::Parse("bad".into()).is_retryable());
}

#[test]
fn unauthorized_covers_401_and_403_only() {
    assert!(SupabaseError::Api { status: 401, message: String::new() }.is_unauthorized());
    assert!(SupabaseError::Api { status: 403, message: String::new() }.is_unauthorized());
    assert!(!SupabaseError::Api { status: 400, message: String::new() }.is_unauthorized());
    assert!(!SupabaseError::Request("timeout".into()).is_unauthorized());
}

// =============================================================================
// User / Session
// =============================================================================

#[test]
fn user_ignores_unknown_fields_and_defaults_missing() {
    let user: User = serde_json::from_value(json!({"id": USER_ID})).unwrap();
    assert_eq!(user.id.to_string(), USER_ID);
    assert!(user.email.is_none());
    assert!(user.last_sign_in_at.is_none());

    let full: User = serde_json::from_value(user_json()).unwrap();
    assert_eq!(full.email.as_deref(), Some("ada@example.com"));
    assert_eq!(full.role.as_deref(), Some("authenticated"));
}

#[test]
fn session_defaults_token_type() {
    let session: Session = serde_json::from_value(json!({
        "access_token": "at",
        "refresh_token": "rt",
        "expires_in": 3600,
        "user": user_json()
    }))
    .unwrap();
    assert_eq!(session.token_type, "bearer");
    assert_eq!(session.expires_in, 3600);
    assert!(session.expires_at.is_none());
}

// =============================================================================
// parse_sign_up
// =============================================================================

#[test]
fn sign_up_with_session_is_signed_in() {
    let body = json!({
        "access_token": "at",
        "refresh_token": "rt",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_700_000_000,
        "user": user_json()
    });
    match parse_sign_up(body).unwrap() {
        SignUpOutcome::Session(s) => {
            assert_eq!(s.access_token, "at");
            assert_eq!(s.expires_at, Some(1_700_000_000));
        }
        SignUpOutcome::ConfirmationSent(_) => panic!("expected session"),
    }
}

#[test]
fn sign_up_bare_user_awaits_confirmation() {
    match parse_sign_up(user_json()).unwrap() {
        SignUpOutcome::ConfirmationSent(user) => assert_eq!(user.email.as_deref(), Some("ada@example.com")),
        SignUpOutcome::Session(_) => panic!("expected confirmation"),
    }
}

#[test]
fn sign_up_nested_user_awaits_confirmation() {
    let body = json!({"user": user_json(), "session": null});
    assert!(matches!(parse_sign_up(body).unwrap(), SignUpOutcome::ConfirmationSent(_)));
}

#[test]
fn sign_up_garbage_is_parse_error() {
    let err = parse_sign_up(json!({"unexpected": true})).unwrap_err();
    assert!(matches!(err, SupabaseError::Parse(_)));
}
