use std::time::Duration;

use crate::client::ClientConfig;
use crate::error::TmbError;

pub(crate) const DEFAULT_URL: &str = "https://api.tmb.cat/v1";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn load_config() -> Result<ClientConfig, TmbError> {
    resolve_config(|name| std::env::var(name).ok())
}

/// Resolves the client configuration from an environment lookup.
///
/// `TMB_APP_ID` and `TMB_APP_KEY` are required, `TMB_API_URL` overrides the
/// default endpoint. Blank values count as missing.
pub(crate) fn resolve_config<F>(lookup: F) -> Result<ClientConfig, TmbError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| {
        lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let app_id = var("TMB_APP_ID").ok_or_else(|| missing("TMB_APP_ID", "app_id"))?;
    let app_key = var("TMB_APP_KEY").ok_or_else(|| missing("TMB_APP_KEY", "app_key"))?;
    let url = var("TMB_API_URL").unwrap_or_else(|| DEFAULT_URL.to_string());

    Ok(ClientConfig {
        url,
        app_id,
        app_key,
        timeout: DEFAULT_TIMEOUT,
    })
}

fn missing(var: &str, what: &str) -> TmbError {
    TmbError::Configuration(format!(
        "Missing configuration: {} (set {} to the value shown at https://developer.tmb.cat)",
        what, var
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolves_credentials_and_default_url() {
        let vars = env(&[("TMB_APP_ID", "abc"), ("TMB_APP_KEY", "secret")]);
        let cfg = resolve_config(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(cfg.app_id, "abc");
        assert_eq!(cfg.app_key, "secret");
        assert_eq!(cfg.url, DEFAULT_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }

    #[test]
    fn url_override() {
        let vars = env(&[
            ("TMB_APP_ID", "abc"),
            ("TMB_APP_KEY", "secret"),
            ("TMB_API_URL", "http://localhost:8080/v1"),
        ]);
        let cfg = resolve_config(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(cfg.url, "http://localhost:8080/v1");
    }

    #[test]
    fn missing_key_names_the_variable() {
        let vars = env(&[("TMB_APP_ID", "abc"), ("TMB_APP_KEY", "   ")]);
        let err = resolve_config(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, TmbError::Configuration(_)));
        assert!(err.to_string().contains("TMB_APP_KEY"));
    }

    #[test]
    fn missing_id_is_reported_first() {
        let err = resolve_config(|_| None).unwrap_err();
        assert!(err.to_string().contains("TMB_APP_ID"));
    }
}
