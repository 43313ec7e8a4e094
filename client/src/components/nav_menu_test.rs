use access::Role;

use super::*;
use crate::session::{Actor, UserSession};

fn signed_in(role: Role) -> AuthState {
    AuthState::resolved(Some(UserSession::new("sam@example.com", "Sam", role, 1)))
}

#[test]
fn menu_items_empty_without_user() {
    assert!(menu_items(&AuthState::default()).is_empty());
    assert!(menu_items(&AuthState::resolved(None)).is_empty());
}

#[test]
fn menu_items_follow_role() {
    assert_eq!(menu_items(&signed_in(Role::Investor)), nav::resolve_role(Role::Investor));
}

#[test]
fn identity_label_shows_role() {
    assert_eq!(identity_label(&signed_in(Role::Builder)).as_deref(), Some("Sam (builder)"));
    assert_eq!(identity_label(&AuthState::resolved(None)), None);
}

#[test]
fn identity_label_names_impersonator() {
    let mut state = signed_in(Role::Client);
    if let Some(user) = state.user.as_mut() {
        user.impersonated_by = Some(Actor {
            email: "root@example.com".to_owned(),
            name: "Root".to_owned(),
            role: Role::Admin,
        });
    }
    assert_eq!(identity_label(&state).as_deref(), Some("Sam (client) via Root"));
}

#[test]
fn identity_label_omits_self_role_switch() {
    let mut state = signed_in(Role::Builder);
    if let Some(user) = state.user.as_mut() {
        user.impersonated_by = Some(Actor {
            email: "sam@example.com".to_owned(),
            name: "Sam".to_owned(),
            role: Role::Admin,
        });
    }
    assert_eq!(identity_label(&state).as_deref(), Some("Sam (builder)"));
}

#[test]
fn only_admin_authority_can_switch_roles() {
    assert_eq!(switchable_roles(&signed_in(Role::Admin)), Role::ALL.to_vec());
    assert_eq!(switchable_roles(&signed_in(Role::Builder)), vec![Role::Builder]);
    assert!(switchable_roles(&AuthState::resolved(None)).is_empty());
}

#[test]
fn admin_viewing_as_builder_can_switch_back() {
    let mut state = signed_in(Role::Builder);
    if let Some(user) = state.user.as_mut() {
        user.impersonated_by = Some(Actor {
            email: "sam@example.com".to_owned(),
            name: "Sam".to_owned(),
            role: Role::Admin,
        });
    }
    assert!(switchable_roles(&state).contains(&Role::Admin));
}
