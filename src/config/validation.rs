//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use crate::fs::naming::validate_template;
use regex::Regex;
use url::Url;

/// Minimum length for user agent.
const MIN_USER_AGENT_LENGTH: usize = 20;

/// Upper bound for concurrent page requests.
pub const MAX_CONCURRENCY: usize = 16;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_user_agent(&config.client.user_agent)?;
    validate_base_url("base_url", &config.client.base_url)?;
    validate_base_url("accounts_url", &config.client.accounts_url)?;
    validate_concurrency(config.download.concurrency)?;

    let naming = &config.download.naming;
    validate_template("naming.single_file", &naming.single_file, false)?;
    validate_template("naming.multiple_file", &naming.multiple_file, true)?;
    validate_template("naming.folder", &naming.folder, false)?;

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.trim().is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    if user_agent.len() < MIN_USER_AGENT_LENGTH {
        return Err(Error::ConfigValidation {
            field: "user_agent".to_string(),
            message: format!(
                "User agent must be at least {} characters (got {})",
                MIN_USER_AGENT_LENGTH,
                user_agent.len()
            ),
        });
    }

    Ok(())
}

/// Validate a base URL; relative endpoints are joined onto it.
pub fn validate_base_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("'{}' must be an http(s) URL", value),
        });
    }

    if !url.path().ends_with('/') {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("'{}' must end with '/'", value),
        });
    }

    Ok(())
}

/// Validate the page concurrency.
pub fn validate_concurrency(concurrency: usize) -> Result<()> {
    if concurrency == 0 || concurrency > MAX_CONCURRENCY {
        return Err(Error::ConfigValidation {
            field: "concurrency".to_string(),
            message: format!(
                "Concurrency must be between 1 and {} (got {})",
                MAX_CONCURRENCY, concurrency
            ),
        });
    }

    Ok(())
}

/// Extract a work ID from a work URL or a direct ID string.
pub fn parse_work_id(input: &str) -> Result<String> {
    let input = input.trim();

    // Direct ID
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return Ok(input.to_string());
    }

    // If it's a URL, extract the illust_id parameter
    if input.starts_with("http://") || input.starts_with("https://") {
        let id_pattern = Regex::new(r"[?&]illust_id=(\d+)").unwrap();

        if let Some(id) = id_pattern.captures(input).and_then(|c| c.get(1)) {
            return Ok(id.as_str().to_string());
        }

        return Err(Error::ConfigValidation {
            field: "id_or_list".to_string(),
            message: format!("Could not extract a work ID from URL: {}", input),
        });
    }

    Err(Error::ConfigValidation {
        field: "id_or_list".to_string(),
        message: format!(
            "'{}' is not a work ID; downloading from a list is not supported",
            input
        ),
    })
}
