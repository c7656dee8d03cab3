use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rostrum_core::{AppError, UserIdentity};
use serde::{Deserialize, Serialize};

use crate::CapabilitySet;

/// Role identifier attached to a principal or to a managed row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PrincipalRole {
    /// Full administrator.
    Admin,
    /// Delegated administrator.
    SubAdmin,
    /// Any other role name, kept verbatim.
    Other(String),
}

impl PrincipalRole {
    /// Returns a stable transport value for this role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "ADMIN",
            Self::SubAdmin => "SUBADMIN",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Returns whether a principal holding this role may edit or delete a
    /// row owned by `target`.
    ///
    /// A sub-admin may not manage admins or other sub-admins, and an admin may
    /// not manage another admin. Rows without a role are unrestricted.
    #[must_use]
    pub fn may_manage(&self, target: Option<&PrincipalRole>) -> bool {
        match (self, target) {
            (_, None) => true,
            (Self::SubAdmin, Some(Self::Admin | Self::SubAdmin)) => false,
            (Self::Admin, Some(Self::Admin)) => false,
            _ => true,
        }
    }
}

impl FromStr for PrincipalRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "role name must not be empty".to_owned(),
            ));
        }

        if trimmed.eq_ignore_ascii_case("ADMIN") {
            Ok(Self::Admin)
        } else if trimmed.eq_ignore_ascii_case("SUBADMIN") {
            Ok(Self::SubAdmin)
        } else {
            Ok(Self::Other(trimmed.to_owned()))
        }
    }
}

impl TryFrom<String> for PrincipalRole {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

impl From<PrincipalRole> for String {
    fn from(value: PrincipalRole) -> Self {
        value.as_str().to_owned()
    }
}

impl Display for PrincipalRole {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Authenticated principal resolved from the session collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    identity: UserIdentity,
    role: PrincipalRole,
    capabilities: CapabilitySet,
}

impl Principal {
    /// Creates a principal from identity, role and granted capabilities.
    #[must_use]
    pub fn new(identity: UserIdentity, role: PrincipalRole, capabilities: CapabilitySet) -> Self {
        Self {
            identity,
            role,
            capabilities,
        }
    }

    /// Returns the identity.
    #[must_use]
    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Returns the role.
    #[must_use]
    pub fn role(&self) -> &PrincipalRole {
        &self.role
    }

    /// Returns granted capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::PrincipalRole;

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert!(matches!(
            PrincipalRole::from_str("subadmin"),
            Ok(PrincipalRole::SubAdmin)
        ));
        assert!(matches!(
            PrincipalRole::from_str(" Admin "),
            Ok(PrincipalRole::Admin)
        ));
        assert!(matches!(
            PrincipalRole::from_str("SUPPORT"),
            Ok(PrincipalRole::Other(name)) if name == "SUPPORT"
        ));
        assert!(PrincipalRole::from_str("  ").is_err());
    }

    #[test]
    fn sub_admin_cannot_manage_admin_tiers() {
        let sub_admin = PrincipalRole::SubAdmin;
        assert!(!sub_admin.may_manage(Some(&PrincipalRole::Admin)));
        assert!(!sub_admin.may_manage(Some(&PrincipalRole::SubAdmin)));
        assert!(sub_admin.may_manage(Some(&PrincipalRole::Other("USER".to_owned()))));
        assert!(sub_admin.may_manage(None));
    }

    #[test]
    fn admin_cannot_manage_another_admin() {
        let admin = PrincipalRole::Admin;
        assert!(!admin.may_manage(Some(&PrincipalRole::Admin)));
        assert!(admin.may_manage(Some(&PrincipalRole::SubAdmin)));
    }

    #[test]
    fn other_roles_are_not_restricted_by_role_tier() {
        let support = PrincipalRole::Other("SUPPORT".to_owned());
        assert!(support.may_manage(Some(&PrincipalRole::Admin)));
    }
}
