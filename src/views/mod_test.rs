use super::*;
use crate::diagnostics::{ConnectionStatus, ErrorDetails, ReportDetails, SuccessDetails};
use crate::state::test_helpers::dummy_user;

fn views() -> Views {
    Views::new().unwrap()
}

#[test]
fn all_templates_compile() {
    assert!(Views::new().is_ok());
}

#[test]
fn landing_links_to_login_signup_and_diagnostics() {
    let html = views().landing().unwrap();
    assert!(html.contains("Welcome to PicShare"));
    assert!(html.contains("Please log in or sign up to continue"));
    assert!(html.contains(r#"href="/login""#));
    assert!(html.contains(r#"href="/signup""#));
    assert!(html.contains(r#"href="/test-supabase""#));
    assert!(html.contains("<title>PicShare</title>"));
}

#[test]
fn welcome_shows_email_id_and_logout() {
    let user = dummy_user("ada@example.com");
    let html = views().welcome(&user).unwrap();
    assert!(html.contains("Welcome, ada@example.com"));
    assert!(html.contains(&format!("Your user ID: {}", user.id)));
    assert!(html.contains("Email: ada@example.com"));
    assert!(html.contains(r#"action="/logout""#));
    assert!(html.contains("You are successfully logged in!"));
}

#[test]
fn welcome_escapes_email() {
    let user = dummy_user("<script>alert(1)</script>");
    let html = views().welcome(&user).unwrap();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[test]
fn login_form_renders_error_and_csrf() {
    let html = views()
        .auth_form(&AuthForm {
            mode: AuthMode::Login,
            email: "ada@example.com",
            error: Some("Invalid login credentials"),
            csrf_token: "tok123",
        })
        .unwrap();
    assert!(html.contains(r#"action="/login""#));
    assert!(html.contains(r#"value="tok123""#));
    assert!(html.contains(r#"value="ada@example.com""#));
    assert!(html.contains("Invalid login credentials"));
    assert!(html.contains(r#"href="/signup""#));
}

#[test]
fn signup_form_without_error_omits_error_block() {
    let html = views()
        .auth_form(&AuthForm { mode: AuthMode::Signup, email: "", error: None, csrf_token: "t" })
        .unwrap();
    assert!(html.contains(r#"action="/signup""#));
    assert!(html.contains("Sign up for PicShare"));
    assert!(!html.contains(r#"<p class="form-error">"#));
}

#[test]
fn signup_pending_mentions_email() {
    let html = views().signup_pending("ada@example.com").unwrap();
    assert!(html.contains("Check your email"));
    assert!(html.contains("ada@example.com"));
}

#[test]
fn diagnostics_success_page() {
    let report = ConnectionReport {
        status: ConnectionStatus::Success,
        message: "Supabase connection successful!".into(),
        details: ReportDetails::Success(SuccessDetails {
            url: "https://abcd.supabase.co".into(),
            project_ref: Some("abcd".into()),
            auth_session: "Session found".into(),
            test_query: "Query successful".into(),
        }),
    };
    let html = views().diagnostics(&report).unwrap();
    assert!(html.contains("Supabase Connection Test"));
    assert!(html.contains("Connection Successful"));
    assert!(html.contains("indicator-success"));
    assert!(html.contains("What this means"));
    assert!(html.contains("projectRef"));
    assert!(html.contains(r#"href="/""#));
}

#[test]
fn diagnostics_error_page() {
    let report = ConnectionReport {
        status: ConnectionStatus::Error,
        message: "Connection failed: request failed: dns error".into(),
        details: ReportDetails::Error(ErrorDetails {
            url: "https://abcd.supabase.co".into(),
            error: "request failed: dns error".into(),
        }),
    };
    let html = views().diagnostics(&report).unwrap();
    assert!(html.contains("Connection Failed"));
    assert!(html.contains("indicator-error"));
    assert!(html.contains("Common fixes"));
    assert!(html.contains("Connection failed: request failed: dns error"));
    assert!(!html.contains("What this means"));
}
