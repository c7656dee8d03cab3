use async_trait::async_trait;
use reqwest::StatusCode;
use rostrum_application::SessionProvider;
use rostrum_core::{AppError, AppResult, UserIdentity};
use rostrum_domain::{Capability, CapabilitySet, Principal, PrincipalRole};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::http_client::{HttpBackendConfig, server_error};

const SESSION_PATH: &str = "auth/me";

/// Session port backed by `GET {base}/auth/me`.
///
/// A `401 Unauthorized` answer means nobody is signed in.
pub struct HttpSessionProvider {
    http_client: reqwest::Client,
    config: HttpBackendConfig,
}

impl HttpSessionProvider {
    /// Creates a new session provider.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: HttpBackendConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionBody {
    subject: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    role: RoleBody,
    #[serde(default)]
    permissions: Vec<Capability>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoleBody {
    Name(String),
    Named { name: String },
}

impl SessionBody {
    fn into_principal(self) -> AppResult<Principal> {
        let role_name = match self.role {
            RoleBody::Name(name) | RoleBody::Named { name } => name,
        };
        let role = role_name.parse::<PrincipalRole>()?;
        let display_name = self
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.subject.clone());
        let identity = UserIdentity::new(self.subject, display_name, self.email);

        Ok(Principal::new(
            identity,
            role,
            self.permissions.into_iter().collect::<CapabilitySet>(),
        ))
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn current_principal(&self) -> AppResult<Option<Principal>> {
        let endpoint = self.config.endpoint(SESSION_PATH)?;
        let response = self
            .config
            .authorize(self.http_client.get(endpoint))
            .send()
            .await
            .map_err(|error| {
                AppError::Transport(format!("failed to call session endpoint: {error}"))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            debug!("session endpoint reports no signed-in principal");
            return Ok(None);
        }

        if !status.is_success() {
            let error = server_error(response).await;
            warn!(
                status = status.as_u16(),
                error = %error,
                "session endpoint returned failure status"
            );
            return Err(error);
        }

        let body = response.json::<SessionBody>().await.map_err(|error| {
            AppError::Transport(format!(
                "failed to parse session endpoint response body: {error}"
            ))
        })?;

        let principal = body.into_principal()?;
        debug!(
            subject = %principal.identity().subject(),
            role = %principal.role(),
            capabilities = principal.capabilities().len(),
            "loaded session principal"
        );

        Ok(Some(principal))
    }
}

#[cfg(test)]
mod tests {
    use rostrum_domain::PrincipalRole;
    use serde_json::json;

    use super::SessionBody;

    #[test]
    fn mixed_permission_forms_become_one_capability_set() {
        let body = serde_json::from_value::<SessionBody>(json!({
            "subject": "u-7",
            "displayName": "Ops Lead",
            "role": {"name": "subadmin"},
            "permissions": ["View Users", {"name": "Delete User", "description": "remove"}]
        }))
        .unwrap_or_else(|_| unreachable!());

        let principal = body.into_principal().unwrap_or_else(|_| unreachable!());
        assert_eq!(principal.role(), &PrincipalRole::SubAdmin);
        assert!(principal.capabilities().contains("View Users"));
        assert!(principal.capabilities().contains("Delete User"));
        assert_eq!(principal.identity().display_name(), "Ops Lead");
    }

    #[test]
    fn display_name_falls_back_to_subject() {
        let body = serde_json::from_value::<SessionBody>(json!({
            "subject": "u-9",
            "role": "AUDITOR"
        }))
        .unwrap_or_else(|_| unreachable!());

        let principal = body.into_principal().unwrap_or_else(|_| unreachable!());
        assert_eq!(principal.identity().display_name(), "u-9");
        assert!(principal.capabilities().is_empty());
        assert_eq!(principal.role().as_str(), "AUDITOR");
    }

    #[test]
    fn blank_role_is_rejected() {
        let body = serde_json::from_value::<SessionBody>(json!({
            "subject": "u-1",
            "role": "  "
        }))
        .unwrap_or_else(|_| unreachable!());

        assert!(body.into_principal().is_err());
    }
}
