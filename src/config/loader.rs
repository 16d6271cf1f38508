//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::MedcartConfig;
use super::secret::secret_string;
use crate::domain::errors::MedcartError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into MedcartConfig
/// 4. Applies environment variable overrides (MEDCART_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use medcart::config::loader::load_config;
///
/// let config = load_config("medcart.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MedcartConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MedcartError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MedcartError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration from `path` when given, otherwise uses defaults
///
/// Environment overrides and validation apply in both cases.
///
/// # Errors
///
/// Returns an error if the file is given but invalid, or if the resulting
/// configuration fails validation.
pub fn load_config_or_default(path: Option<&Path>) -> Result<MedcartConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = MedcartConfig::default();
            apply_env_overrides(&mut config)?;
            validate(&config)?;
            Ok(config)
        }
    }
}

/// Parses configuration text, applying substitution, overrides and validation
///
/// # Errors
///
/// Returns a configuration error on any failure.
pub fn parse_config(contents: &str) -> Result<MedcartConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: MedcartConfig = toml::from_str(&contents)
        .map_err(|e| MedcartError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &MedcartConfig) -> Result<()> {
    config.validate().map_err(|e| {
        MedcartError::Configuration(format!("Configuration validation failed: {}", e))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MedcartError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(MedcartError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using MEDCART_* prefix
///
/// Environment variables follow the pattern: MEDCART_<SECTION>_<KEY>
/// For example: MEDCART_QUOTE_BASE_URL, MEDCART_APPLICATION_LOG_LEVEL
///
/// # Errors
///
/// Returns an error if a numeric override cannot be parsed
fn apply_env_overrides(config: &mut MedcartConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("MEDCART_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("MEDCART_APPLICATION_CURRENCY") {
        config.application.currency = val;
    }

    // Vendor overrides (comma separated, canonical order)
    if let Ok(val) = std::env::var("MEDCART_VENDORS_IDS") {
        config.vendors.ids = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    // Store overrides
    if let Ok(val) = std::env::var("MEDCART_STORE_SNAPSHOT_PATH") {
        config.store.snapshot_path = Some(val);
    }
    if let Ok(val) = std::env::var("MEDCART_STORE_MAX_CONCURRENT_READS") {
        config.store.max_concurrent_reads =
            parse_override("MEDCART_STORE_MAX_CONCURRENT_READS", &val)?;
    }

    // Quote overrides
    if let Ok(val) = std::env::var("MEDCART_QUOTE_BASE_URL") {
        config.quote.base_url = Some(val);
    }
    if let Ok(val) = std::env::var("MEDCART_QUOTE_API_KEY") {
        config.quote.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("MEDCART_QUOTE_TIMEOUT_SECONDS") {
        config.quote.timeout_seconds = parse_override("MEDCART_QUOTE_TIMEOUT_SECONDS", &val)?;
    }

    // Delivery overrides
    if let Ok(val) = std::env::var("MEDCART_DELIVERY_CUSTOMER_LAT") {
        config.delivery.customer_lat = parse_override("MEDCART_DELIVERY_CUSTOMER_LAT", &val)?;
    }
    if let Ok(val) = std::env::var("MEDCART_DELIVERY_CUSTOMER_LNG") {
        config.delivery.customer_lng = parse_override("MEDCART_DELIVERY_CUSTOMER_LNG", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("MEDCART_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("MEDCART_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        MedcartError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("MEDCART_TEST_SUBST_VAR", "test_value");
        let input = "api_key = \"${MEDCART_TEST_SUBST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_key = \"test_value\"");
        std::env::remove_var("MEDCART_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("MEDCART_TEST_MISSING_VAR");
        let input = "api_key = \"${MEDCART_TEST_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# api_key = \"${MEDCART_TEST_COMMENTED_OUT}\"\n[application]";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-medcart.toml");
        assert!(matches!(result, Err(MedcartError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        std::env::set_var("MEDCART_TEST_QUOTE_KEY", "qk-123");
        let toml_content = r#"
[application]
log_level = "debug"
currency = "INR"

[vendors]
ids = ["site-b", "site-a"]

[quote]
base_url = "https://quotes.example.com"
api_key = "${MEDCART_TEST_QUOTE_KEY}"
timeout_seconds = 5

[delivery]
customer_lat = 18.5204
customer_lng = 73.8567
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        std::env::remove_var("MEDCART_TEST_QUOTE_KEY");

        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.vendors.ids, vec!["site-b", "site-a"]);
        assert_eq!(config.quote.timeout_seconds, 5);
        assert_eq!(config.quote.api_key.as_ref().unwrap().expose_secret(), "qk-123");
        assert_eq!(config.store.max_concurrent_reads, 16);
    }

    #[test]
    fn test_parse_config_rejects_invalid_values() {
        let result = parse_config("[quote]\ntimeout_seconds = 0\n");
        assert!(matches!(result, Err(MedcartError::Configuration(_))));
    }

    #[test]
    fn test_load_config_or_default_without_file() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.vendors.ids.len(), 3);
    }
}
