use super::*;

#[test]
fn build_session_trims_and_parses_role() {
    let session = build_session("  ana@example.com ", " Ana ", "accountant", 7).unwrap();
    assert_eq!(session.email, "ana@example.com");
    assert_eq!(session.name, "Ana");
    assert_eq!(session.role, Role::Accountant);
    assert_eq!(session.login_time, 7);
}

#[test]
fn build_session_requires_identity() {
    assert!(build_session("", "Ana", "client", 0).is_err());
    assert!(build_session("ana@example.com", "   ", "client", 0).is_err());
}

#[test]
fn build_session_rejects_unknown_role() {
    let err = build_session("ana@example.com", "Ana", "owner", 0).unwrap_err();
    assert!(err.contains("owner"));
}
