use std::str::FromStr;

use super::*;

impl AuthorizationService {
    /// Returns the list screens a principal may open, in navigation order.
    #[must_use]
    pub fn accessible_screens(&self, principal: Option<&Principal>) -> Vec<ListScreen> {
        ListScreen::all()
            .iter()
            .copied()
            .filter(|screen| self.is_authorized(principal, &[screen.capabilities().view]))
            .collect()
    }

    /// Returns the edit/delete affordances for one row of `screen`.
    #[must_use]
    pub fn row_actions(
        &self,
        principal: Option<&Principal>,
        screen: ListScreen,
        row: &Value,
    ) -> RowActions {
        let capabilities = screen.capabilities();
        let target_role = row_target_role(screen, row);

        RowActions {
            can_edit: self.row_action_allowed(
                principal,
                &[capabilities.update],
                target_role.as_ref(),
            ),
            can_delete: self.row_action_allowed(
                principal,
                &[capabilities.delete],
                target_role.as_ref(),
            ),
        }
    }
}

/// Reads the role owning a row, accepting `"ADMIN"` or `{"name": "ADMIN"}`.
fn row_target_role(screen: ListScreen, row: &Value) -> Option<PrincipalRole> {
    let value = row.get(screen.row_role_field()?)?;
    let name = match value {
        Value::String(name) => name.as_str(),
        Value::Object(object) => object.get("name")?.as_str()?,
        _ => return None,
    };

    PrincipalRole::from_str(name).ok()
}
