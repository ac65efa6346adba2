use reqwest::Url;

use crate::app_config::{FormMethod, PageConfig};
use crate::geo::RadiusBound;
use crate::ConfigError;

/// Load page configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_page_config() -> Result<PageConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_page_config_from_env()
}

/// Load page configuration from environment variables already in the process.
///
/// Unlike [`load_page_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_page_config_from_env() -> Result<PageConfig, ConfigError> {
    build_page_config(|key| std::env::var(key))
}

/// Build page configuration using the provided env-var lookup function.
///
/// Every variable is optional; defaults mirror the values a page renders when
/// it does not override them.
fn build_page_config<F>(lookup: F) -> Result<PageConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = PageConfig::default();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_km = |var: &str, default: f64| -> Result<f64, ConfigError> {
        let Ok(raw) = lookup(var) else {
            return Ok(default);
        };
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() {
            return Err(invalid(var, "must be a finite number".to_string()));
        }
        Ok(value)
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        lookup(var).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<u32>()
                .map_err(|e| invalid(var, e.to_string()))
        })
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        lookup(var).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| invalid(var, e.to_string()))
        })
    };

    let base_url = or_default("NEARBY_BASE_URL", &defaults.base_url);
    validate_base_url(&base_url)?;

    let results_url = or_default("NEARBY_RESULTS_URL", &defaults.results_url);
    let search_action = or_default("NEARBY_SEARCH_ACTION", &defaults.search_action);
    let search_method = match lookup("NEARBY_SEARCH_METHOD") {
        Ok(raw) => parse_method("NEARBY_SEARCH_METHOD", &raw)?,
        Err(_) => defaults.search_method,
    };
    let geocode_endpoint = match lookup("NEARBY_GEOCODE_ENDPOINT") {
        Ok(raw) if raw.trim().is_empty() => None,
        Ok(raw) => Some(raw.trim().to_string()),
        Err(_) => defaults.geocode_endpoint.clone(),
    };

    let page_size = parse_u32("NEARBY_PAGE_SIZE", defaults.page_size)?.max(1);

    let radius = RadiusBound {
        min: parse_km("NEARBY_RADIUS_MIN_KM", defaults.radius.min)?,
        max: parse_km("NEARBY_RADIUS_MAX_KM", defaults.radius.max)?,
        default: parse_km("NEARBY_DEFAULT_RADIUS_KM", defaults.radius.default)?,
    };
    if radius.min > radius.max {
        return Err(ConfigError::InvertedRadiusBounds {
            min: radius.min,
            max: radius.max,
        });
    }

    let partial_updates = parse_flag(
        "NEARBY_PARTIAL_UPDATES",
        &or_default("NEARBY_PARTIAL_UPDATES", "false"),
    )?;
    let results_target = or_default("NEARBY_RESULTS_TARGET", &defaults.results_target);
    let csrf_meta = lookup("NEARBY_CSRF_META").ok().filter(|v| !v.is_empty());
    let cookies = lookup("NEARBY_COOKIES").ok().filter(|v| !v.is_empty());
    let request_timeout_secs =
        parse_u64("NEARBY_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?;
    let user_agent = or_default("NEARBY_USER_AGENT", &defaults.user_agent);
    let log_level = or_default("NEARBY_LOG_LEVEL", &defaults.log_level);

    Ok(PageConfig {
        base_url,
        results_url,
        search_action,
        search_method,
        geocode_endpoint,
        page_size,
        radius,
        partial_updates,
        results_target,
        csrf_meta,
        cookies,
        request_timeout_secs,
        user_agent,
        log_level,
    })
}

/// The base URL must parse as an absolute http(s) URL with a host.
fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "NEARBY_BASE_URL".to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(format!("'{raw}' is not a URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid(format!("'{raw}' is not an absolute http(s) URL")));
    }
    Ok(())
}

fn parse_method(var: &str, raw: &str) -> Result<FormMethod, ConfigError> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "GET" => Ok(FormMethod::Get),
        "POST" => Ok(FormMethod::Post),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected GET or POST, got '{other}'"),
        }),
    }
}

/// Parse a boolean-ish flag value.
fn parse_flag(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
