use std::str::FromStr;

use rostrum_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{FilterField, FilterSpec};

/// Administrative list screens of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListScreen {
    /// User accounts.
    Users,
    /// Roles and their grants.
    Roles,
    /// Permission catalogue.
    Permissions,
    /// Outbound notifications.
    Notifications,
}

/// Capability names guarding one screen and its actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCapabilities {
    /// Required to open the screen and fetch rows.
    pub view: &'static str,
    /// Required to show the create action.
    pub create: &'static str,
    /// Required to show the row-level edit action.
    pub update: &'static str,
    /// Required to show the row-level delete action.
    pub delete: &'static str,
}

impl ListScreen {
    /// Returns all screens in navigation order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ListScreen] = &[
            ListScreen::Users,
            ListScreen::Roles,
            ListScreen::Permissions,
            ListScreen::Notifications,
        ];

        ALL
    }

    /// Returns a stable transport value for this screen.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Roles => "roles",
            Self::Permissions => "permissions",
            Self::Notifications => "notifications",
        }
    }

    /// Returns the REST collection path relative to the API base URL.
    #[must_use]
    pub fn resource_path(&self) -> &'static str {
        self.as_str()
    }

    /// Returns the capabilities guarding this screen.
    #[must_use]
    pub fn capabilities(&self) -> ScreenCapabilities {
        match self {
            Self::Users => ScreenCapabilities {
                view: "View Users",
                create: "Create User",
                update: "Update User",
                delete: "Delete User",
            },
            Self::Roles => ScreenCapabilities {
                view: "View Roles",
                create: "Create Role",
                update: "Update Role",
                delete: "Delete Role",
            },
            Self::Permissions => ScreenCapabilities {
                view: "View Permissions",
                create: "Create Permission",
                update: "Update Permission",
                delete: "Delete Permission",
            },
            Self::Notifications => ScreenCapabilities {
                view: "View Notifications",
                create: "Create Notification",
                update: "Update Notification",
                delete: "Delete Notification",
            },
        }
    }

    /// Returns the row field carrying the target role for row-level actions.
    #[must_use]
    pub fn row_role_field(&self) -> Option<&'static str> {
        match self {
            Self::Users => Some("role"),
            Self::Roles => Some("name"),
            Self::Permissions | Self::Notifications => None,
        }
    }

    /// Returns the declarative filter spec of this screen.
    pub fn filter_spec(&self) -> AppResult<FilterSpec> {
        match self {
            Self::Users => FilterSpec::new(vec![
                FilterField::exact_match("role", "role.name")?
                    .with_all_sentinel("All")?
                    .with_null_sentinel("None")?,
                FilterField::exact_match("status", "status")?.with_all_sentinel("All")?,
                FilterField::date_range("createdDate", "createdDate")?,
            ])?
            .with_search(["username", "email", "fullName"]),
            Self::Roles => FilterSpec::new(vec![
                FilterField::text_contains("description", "description")?,
                FilterField::date_range("createdDate", "createdDate")?,
            ])?
            .with_search(["name"]),
            Self::Permissions => FilterSpec::new(vec![
                FilterField::text_contains("name", "name")?,
                FilterField::text_contains("api", "api")?,
                FilterField::text_contains("module", "module")?.with_all_sentinel("All")?,
                FilterField::exact_match("method", "method")?.with_all_sentinel("All")?,
            ]),
            Self::Notifications => FilterSpec::new(vec![
                FilterField::exact_match("type", "type")?.with_all_sentinel("All")?,
                FilterField::exact_match("recipientId", "recipient.id")?,
                FilterField::null_check("unread", "readAt", "Unread")?,
                FilterField::date_range("createdDate", "createdDate")?,
            ])?
            .with_search(["title", "message"]),
        }
    }
}

impl FromStr for ListScreen {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "users" => Ok(Self::Users),
            "roles" => Ok(Self::Roles),
            "permissions" => Ok(Self::Permissions),
            "notifications" => Ok(Self::Notifications),
            other => Err(AppError::Validation(format!(
                "unknown list screen '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::{FilterExpressionCompiler, FilterState};

    use super::ListScreen;

    #[test]
    fn every_screen_declares_a_valid_filter_spec() {
        for screen in ListScreen::all() {
            assert!(screen.filter_spec().is_ok(), "{}", screen.as_str());
            assert_eq!(ListScreen::from_str(screen.as_str()).ok(), Some(*screen));
        }
    }

    #[test]
    fn permission_screen_compiles_observed_operators() {
        let spec = ListScreen::Permissions
            .filter_spec()
            .unwrap_or_default();
        let state = FilterState::new()
            .with_text("name", "  admin  ")
            .with_text("api", "")
            .with_text("module", "All")
            .with_text("method", "GET");

        let compiled = FilterExpressionCompiler::new(spec).compile("", &state);
        assert_eq!(compiled.as_str(), "name~'admin' and method = 'GET'");
    }

    #[test]
    fn user_screen_puts_search_first() {
        let spec = ListScreen::Users.filter_spec().unwrap_or_default();
        let state = FilterState::new().with_text("status", "ACTIVE");

        let compiled = FilterExpressionCompiler::new(spec).compile("ana", &state);
        assert_eq!(
            compiled.as_str(),
            "(username~'ana' or email~'ana' or fullName~'ana') and status = 'ACTIVE'"
        );
    }
}
