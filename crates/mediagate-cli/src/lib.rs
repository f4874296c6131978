use mediagate_core::{AppError, ErrorMetadata, LogLevel};
use serde::Serialize;

/// Parse a `name=value` placeholder rule.
pub fn parse_rule(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {:?}", s))?;
    if name.is_empty() {
        return Err(format!("empty placeholder name in {:?}", s));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Parse a `breakpoint=url` override.
pub fn parse_custom(s: &str) -> Result<(u32, String), String> {
    let (breakpoint, url) = s
        .split_once('=')
        .ok_or_else(|| format!("expected breakpoint=url, got {:?}", s))?;
    let breakpoint = breakpoint
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("breakpoint must be a positive integer, got {:?}", breakpoint))?;
    Ok((breakpoint, url.to_string()))
}

/// Machine-readable error printed by the CLI.
#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<&'static str>,
}

impl ErrorReport {
    /// Error chain details are only included outside production, and never
    /// for sensitive errors.
    pub fn from_app_error(err: &AppError, is_production: bool) -> Self {
        let details = if is_production || err.is_sensitive() {
            None
        } else {
            Some(err.detailed_message())
        };

        Self {
            code: err.error_code(),
            message: err.client_message(),
            details,
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
        }
    }
}

/// Log `err` at the level its metadata asks for.
pub fn log_app_error(err: &AppError) {
    let details = err.detailed_message();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(code = err.error_code(), "{}", details),
        LogLevel::Warn => tracing::warn!(code = err.error_code(), "{}", details),
        LogLevel::Error => tracing::error!(code = err.error_code(), "{}", details),
    }
}

/// Initialize tracing for CLI binaries. Logs go to stderr so stdout stays JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediagate_core::{CompressError, ConfigurationError};

    #[test]
    fn parse_rule_ok() {
        assert_eq!(
            parse_rule("id=42").unwrap(),
            ("id".to_string(), "42".to_string())
        );
        assert_eq!(
            parse_rule("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn parse_rule_invalid() {
        assert!(parse_rule("novalue").is_err());
        assert!(parse_rule("=x").is_err());
    }

    #[test]
    fn parse_custom_ok() {
        assert_eq!(
            parse_custom("640=http://a.jpg").unwrap(),
            (640, "http://a.jpg".to_string())
        );
        assert!(parse_custom("wide=http://a.jpg").is_err());
        assert!(parse_custom("640").is_err());
    }

    #[test]
    fn error_report_for_compress_error() {
        let err = AppError::from(CompressError::from(ConfigurationError::InvalidResolution(
            "abc".to_string(),
        )));
        let report = ErrorReport::from_app_error(&err, false);
        assert_eq!(report.code, "IMAGE_CONFIGURATION_ERROR");
        assert!(report.message.starts_with("resolution error"));
        assert!(report.details.is_some());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["code"], "IMAGE_CONFIGURATION_ERROR");
    }

    #[test]
    fn error_report_omits_details_in_production() {
        let err = AppError::from(CompressError::from(ConfigurationError::InvalidResolution(
            "abc".to_string(),
        )));
        let report = ErrorReport::from_app_error(&err, true);
        assert_eq!(report.details, None);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("details").is_none());
    }

    #[test]
    fn error_report_hides_storage_details() {
        let err = AppError::Storage("secret-bucket".to_string());
        let report = ErrorReport::from_app_error(&err, false);
        assert_eq!(report.code, "STORAGE_ERROR");
        assert!(!report.message.contains("secret-bucket"));
        assert_eq!(report.details, None);
    }
}
