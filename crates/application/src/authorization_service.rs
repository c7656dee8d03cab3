use rostrum_core::{AppError, AppResult};
use rostrum_domain::{CapabilitySet, ListScreen, Principal, PrincipalRole};
use serde::Serialize;
use serde_json::Value;

mod capabilities;
mod screens;

#[cfg(test)]
mod tests;

/// Global authorization switch read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationConfig {
    /// When false every gate is open.
    pub gate_enabled: bool,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self { gate_enabled: true }
    }
}

/// Row-level affordances exposed for one listed record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowActions {
    /// Whether the edit action is shown.
    pub can_edit: bool,
    /// Whether the delete action is shown.
    pub can_delete: bool,
}

/// Returns whether `capabilities` satisfy every entry of `required`.
///
/// A disabled gate and an empty requirement always authorize. With the gate
/// enabled, an absent principal authorizes nothing else.
#[must_use]
pub fn is_authorized(
    capabilities: Option<&CapabilitySet>,
    required: &[&str],
    gate_enabled: bool,
) -> bool {
    if !gate_enabled || required.is_empty() {
        return true;
    }

    let Some(capabilities) = capabilities.filter(|capabilities| !capabilities.is_empty()) else {
        return false;
    };

    required
        .iter()
        .all(|capability| capabilities.contains(capability))
}

/// Application service for capability checks of the active console session.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationService {
    config: AuthorizationConfig,
}

impl AuthorizationService {
    /// Creates a new authorization service from configuration.
    #[must_use]
    pub fn new(config: AuthorizationConfig) -> Self {
        Self { config }
    }

    /// Returns whether capability enforcement is active.
    #[must_use]
    pub fn gate_enabled(&self) -> bool {
        self.config.gate_enabled
    }

    /// Binds the service to the active principal for the rendering layer.
    #[must_use]
    pub fn bind(&self, principal: Option<Principal>) -> BoundAuthorization {
        BoundAuthorization {
            service: *self,
            principal,
        }
    }
}

/// Authorization checks bound to one active principal.
#[derive(Debug, Clone)]
pub struct BoundAuthorization {
    service: AuthorizationService,
    principal: Option<Principal>,
}

impl BoundAuthorization {
    /// Returns the bound principal.
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Returns whether the bound principal satisfies every required capability.
    #[must_use]
    pub fn is_authorized(&self, required: &[&str]) -> bool {
        self.service
            .is_authorized(self.principal.as_ref(), required)
    }

    /// Fails with [`AppError::Forbidden`] unless the bound principal is authorized.
    pub fn require(&self, required: &[&str]) -> AppResult<()> {
        self.service.require(self.principal.as_ref(), required)
    }

    /// Returns whether a row-level action on a row owned by `target_role` is exposed.
    #[must_use]
    pub fn row_action_allowed(
        &self,
        required: &[&str],
        target_role: Option<&PrincipalRole>,
    ) -> bool {
        self.service
            .row_action_allowed(self.principal.as_ref(), required, target_role)
    }

    /// Returns the list screens the bound principal may open.
    #[must_use]
    pub fn accessible_screens(&self) -> Vec<ListScreen> {
        self.service.accessible_screens(self.principal.as_ref())
    }

    /// Returns the edit/delete affordances for one row of `screen`.
    #[must_use]
    pub fn row_actions(&self, screen: ListScreen, row: &Value) -> RowActions {
        self.service
            .row_actions(self.principal.as_ref(), screen, row)
    }
}

fn subject_label(principal: Option<&Principal>) -> String {
    principal
        .map(|principal| principal.identity().subject().to_owned())
        .unwrap_or_else(|| "<anonymous>".to_owned())
}

fn forbidden(principal: Option<&Principal>, capability: &str) -> AppError {
    AppError::Forbidden(format!(
        "subject '{}' is missing capability '{capability}'",
        subject_label(principal)
    ))
}
