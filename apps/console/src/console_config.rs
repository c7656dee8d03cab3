use std::env;
use std::time::Duration;

use rostrum_application::AuthorizationConfig;
use rostrum_core::AppError;
use rostrum_domain::PageSize;
use rostrum_infrastructure::HttpBackendConfig;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/api";

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_base_url: Url,
    pub access_token: Option<String>,
    pub authorization_enabled: bool,
    pub page_size: PageSize,
    pub http_timeout_secs: u64,
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let raw_base_url =
            lookup("CONSOLE_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let api_base_url = Url::parse(raw_base_url.trim()).map_err(|error| {
            AppError::Validation(format!(
                "invalid CONSOLE_API_BASE_URL '{raw_base_url}': {error}"
            ))
        })?;
        if api_base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "CONSOLE_API_BASE_URL '{raw_base_url}' must be an absolute http(s) URL"
            )));
        }

        let access_token = lookup("CONSOLE_ACCESS_TOKEN")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let authorization_enabled = match lookup("CONSOLE_AUTHORIZATION_ENABLED") {
            Some(value) => parse_flag("CONSOLE_AUTHORIZATION_ENABLED", value.as_str())?,
            None => true,
        };

        let page_size = parse_number::<u32>(&lookup, "CONSOLE_PAGE_SIZE", 10)?;
        let page_size = PageSize::new(page_size).map_err(|_| {
            AppError::Validation("CONSOLE_PAGE_SIZE must be greater than zero".to_owned())
        })?;

        let http_timeout_secs = parse_number::<u64>(&lookup, "CONSOLE_HTTP_TIMEOUT_SECS", 15)?;
        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "CONSOLE_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            access_token,
            authorization_enabled,
            page_size,
            http_timeout_secs,
        })
    }

    pub fn backend(&self) -> HttpBackendConfig {
        HttpBackendConfig {
            base_url: self.api_base_url.clone(),
            access_token: self.access_token.clone(),
            timeout: Duration::from_secs(self.http_timeout_secs),
        }
    }

    pub fn authorization(&self) -> AuthorizationConfig {
        AuthorizationConfig {
            gate_enabled: self.authorization_enabled,
        }
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}

fn parse_flag(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AppError::Validation(format!(
            "invalid {name} value '{other}': expected true or false"
        ))),
    }
}

fn parse_number<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<T>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rostrum_core::AppError;

    use super::ConsoleConfig;

    fn load(pairs: &[(&str, &str)]) -> Result<ConsoleConfig, AppError> {
        let values = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect::<BTreeMap<_, _>>();
        ConsoleConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = load(&[]).unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:8080/api");
        assert!(config.authorization_enabled);
        assert_eq!(config.page_size.get(), 10);
        assert_eq!(config.http_timeout_secs, 15);
        assert!(config.access_token.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("CONSOLE_API_BASE_URL", "https://admin.example.com/api/"),
            ("CONSOLE_AUTHORIZATION_ENABLED", "FALSE"),
            ("CONSOLE_PAGE_SIZE", "25"),
            ("CONSOLE_ACCESS_TOKEN", "  "),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert!(!config.authorization().gate_enabled);
        assert_eq!(config.page_size.get(), 25);
        assert!(config.backend().access_token.is_none());
        assert_eq!(
            config.backend().endpoint("roles").map(|url| url.to_string()).ok(),
            Some("https://admin.example.com/api/roles".to_owned())
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        for pairs in [
            [("CONSOLE_PAGE_SIZE", "0")],
            [("CONSOLE_PAGE_SIZE", "ten")],
            [("CONSOLE_HTTP_TIMEOUT_SECS", "0")],
            [("CONSOLE_AUTHORIZATION_ENABLED", "maybe")],
            [("CONSOLE_API_BASE_URL", "not a url")],
        ] {
            assert!(matches!(load(&pairs), Err(AppError::Validation(_))));
        }
    }
}
