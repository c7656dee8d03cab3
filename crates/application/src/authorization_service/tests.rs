use proptest::prelude::*;
use rostrum_core::{AppError, UserIdentity};
use rostrum_domain::{Capability, CapabilitySet, ListScreen, Principal, PrincipalRole};
use serde_json::json;

use super::{AuthorizationConfig, AuthorizationService, RowActions, is_authorized};

fn principal(role: PrincipalRole, capabilities: Vec<Capability>) -> Principal {
    Principal::new(
        UserIdentity::new("alice", "Alice", None),
        role,
        capabilities.into_iter().collect(),
    )
}

fn enforcing() -> AuthorizationService {
    AuthorizationService::new(AuthorizationConfig { gate_enabled: true })
}

#[test]
fn string_capability_authorizes_and_removal_denies() {
    let granted: CapabilitySet = [Capability::identifier("Update Role")]
        .into_iter()
        .collect();
    assert!(is_authorized(Some(&granted), &["Update Role"], true));
    assert!(!is_authorized(
        Some(&CapabilitySet::new()),
        &["Update Role"],
        true
    ));
}

#[test]
fn descriptor_capability_is_equivalent_to_identifier() {
    let granted: CapabilitySet = [Capability::descriptor("Update Role")]
        .into_iter()
        .collect();
    assert!(is_authorized(Some(&granted), &["Update Role"], true));
}

#[test]
fn every_required_capability_must_match() {
    let granted: CapabilitySet = [Capability::identifier("View Roles")].into_iter().collect();
    assert!(!is_authorized(
        Some(&granted),
        &["View Roles", "Delete Role"],
        true
    ));
}

#[test]
fn empty_requirement_is_vacuously_authorized() {
    assert!(is_authorized(None, &[], true));
}

#[test]
fn absent_principal_is_denied_when_gate_is_enabled() {
    assert!(!enforcing().is_authorized(None, &["View Users"]));
}

#[test]
fn require_names_the_missing_capability() {
    let actor = principal(
        PrincipalRole::Admin,
        vec![Capability::identifier("View Users")],
    );
    let result = enforcing().require(Some(&actor), &["View Users", "Delete User"]);

    let Err(AppError::Forbidden(message)) = result else {
        unreachable!("a missing capability is forbidden");
    };
    assert!(message.contains("Delete User"));
    assert!(message.contains("alice"));
}

#[test]
fn sub_admin_cannot_delete_admin_row_despite_capability() {
    let actor = principal(
        PrincipalRole::SubAdmin,
        vec![
            Capability::identifier("Delete Role"),
            Capability::identifier("Update Role"),
        ],
    );
    let service = enforcing();

    assert!(!service.row_action_allowed(
        Some(&actor),
        &["Delete Role"],
        Some(&PrincipalRole::Admin)
    ));
    assert!(service.row_action_allowed(
        Some(&actor),
        &["Delete Role"],
        Some(&PrincipalRole::Other("USER".to_owned()))
    ));
}

#[test]
fn role_rule_applies_with_gate_disabled() {
    let actor = principal(PrincipalRole::Admin, Vec::new());
    let service = AuthorizationService::new(AuthorizationConfig {
        gate_enabled: false,
    });

    assert!(service.is_authorized(Some(&actor), &["Delete User"]));
    assert!(!service.row_action_allowed(
        Some(&actor),
        &["Delete User"],
        Some(&PrincipalRole::Admin)
    ));
}

#[test]
fn row_actions_read_role_from_string_or_object() {
    let actor = principal(
        PrincipalRole::SubAdmin,
        vec![
            Capability::identifier("Update User"),
            Capability::identifier("Delete User"),
        ],
    );
    let service = enforcing();

    let admin_row = json!({"username": "root", "role": {"id": 1, "name": "ADMIN"}});
    assert_eq!(
        service.row_actions(Some(&actor), ListScreen::Users, &admin_row),
        RowActions::default()
    );

    let user_row = json!({"username": "bob", "role": "USER"});
    assert_eq!(
        service.row_actions(Some(&actor), ListScreen::Users, &user_row),
        RowActions {
            can_edit: true,
            can_delete: true,
        }
    );
}

#[test]
fn accessible_screens_follow_view_capabilities() {
    let actor = principal(
        PrincipalRole::SubAdmin,
        vec![
            Capability::identifier("View Users"),
            Capability::descriptor("View Notifications"),
        ],
    );

    assert_eq!(
        enforcing().accessible_screens(Some(&actor)),
        vec![ListScreen::Users, ListScreen::Notifications]
    );
    assert!(enforcing().accessible_screens(None).is_empty());
}

#[test]
fn bound_authorization_uses_the_active_principal() {
    let actor = principal(
        PrincipalRole::Admin,
        vec![Capability::identifier("View Roles")],
    );
    let bound = enforcing().bind(Some(actor));

    assert!(bound.is_authorized(&["View Roles"]));
    assert!(!bound.is_authorized(&["Create Role"]));
    assert!(bound.require(&["Create Role"]).is_err());
    assert_eq!(bound.accessible_screens(), vec![ListScreen::Roles]);
    assert_eq!(
        bound.row_actions(ListScreen::Roles, &json!({"name": "ADMIN"})),
        RowActions::default()
    );
}

proptest! {
    #[test]
    fn disabled_gate_always_authorizes(
        granted in prop::collection::vec("[A-Za-z ]{0,12}", 0..4),
        required in prop::collection::vec("[A-Za-z ]{1,12}", 0..4),
    ) {
        let granted: CapabilitySet = granted.into_iter().map(Capability::Identifier).collect();
        let required = required.iter().map(String::as_str).collect::<Vec<_>>();

        prop_assert!(is_authorized(Some(&granted), &required, false));
        prop_assert!(is_authorized(None, &required, false));
    }

    #[test]
    fn granted_capability_authorizes_in_either_form(name in "[A-Za-z][A-Za-z ]{0,16}[A-Za-z]") {
        let as_identifier: CapabilitySet =
            [Capability::identifier(name.clone())].into_iter().collect();
        let as_descriptor: CapabilitySet =
            [Capability::descriptor(name.clone())].into_iter().collect();

        prop_assert!(is_authorized(Some(&as_identifier), &[name.as_str()], true));
        prop_assert!(is_authorized(Some(&as_descriptor), &[name.as_str()], true));
        prop_assert!(!is_authorized(Some(&CapabilitySet::new()), &[name.as_str()], true));
    }
}
