use super::*;

// =============================================================================
// tokens
// =============================================================================

#[test]
fn csrf_token_encoding_pads_each_byte() {
    assert_eq!(encode_csrf_token(&[0x00, 0x0f, 0xab, 0xff]), "000fabff");
    assert_eq!(encode_csrf_token(&[]), "");
}

#[test]
fn new_csrf_token_is_64_lowercase_hex_chars() {
    let token = new_csrf_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
}

#[test]
fn new_csrf_token_differs_between_calls() {
    assert_ne!(new_csrf_token(), new_csrf_token());
}

// =============================================================================
// csrf_matches
// =============================================================================

#[test]
fn csrf_matches_equal_token() {
    let jar = CookieJar::new().add(Cookie::new(CSRF_COOKIE, "abc"));
    assert!(csrf_matches(&jar, "abc"));
}

#[test]
fn csrf_rejects_mismatch() {
    let jar = CookieJar::new().add(Cookie::new(CSRF_COOKIE, "abc"));
    assert!(!csrf_matches(&jar, "abd"));
}

#[test]
fn csrf_rejects_missing_cookie_even_with_empty_field() {
    assert!(!csrf_matches(&CookieJar::new(), ""));
}

#[test]
fn csrf_cookie_is_http_only_and_scoped() {
    let cookie = csrf_cookie("abc".into(), true);
    assert_eq!(cookie.name(), CSRF_COOKIE);
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(Duration::minutes(CSRF_MAX_AGE_MINUTES)));
}
