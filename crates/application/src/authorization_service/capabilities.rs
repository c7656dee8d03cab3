use super::*;

impl AuthorizationService {
    /// Returns whether the principal satisfies every required capability.
    #[must_use]
    pub fn is_authorized(&self, principal: Option<&Principal>, required: &[&str]) -> bool {
        is_authorized(
            principal.map(Principal::capabilities),
            required,
            self.config.gate_enabled,
        )
    }

    /// Ensures the principal satisfies every required capability.
    pub fn require(&self, principal: Option<&Principal>, required: &[&str]) -> AppResult<()> {
        if self.is_authorized(principal, required) {
            return Ok(());
        }

        let missing = required
            .iter()
            .find(|capability| {
                !principal.is_some_and(|principal| principal.capabilities().contains(capability))
            })
            .copied()
            .unwrap_or_default();

        Err(forbidden(principal, missing))
    }

    /// Returns whether a row-level action is exposed for a row owned by
    /// `target_role`.
    ///
    /// Both the capability check and the role-tier rule must pass. The role
    /// rule still applies when the capability gate is disabled.
    #[must_use]
    pub fn row_action_allowed(
        &self,
        principal: Option<&Principal>,
        required: &[&str],
        target_role: Option<&PrincipalRole>,
    ) -> bool {
        if !self.is_authorized(principal, required) {
            return false;
        }

        principal.is_none_or(|principal| principal.role().may_manage(target_role))
    }
}
