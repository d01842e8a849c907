//! Error types for the Startup Simulator
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - A split between caller-correctable and internal failures
//! - User-friendly messages with suggestions
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::Role;

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,

    // Lookup errors (3xx)
    SessionNotFound = 300,
    ScenarioNotFound = 301,
    ArchetypeNotFound = 302,

    // Request errors (4xx)
    InvalidChoice = 400,
    UnsupportedRole = 401,
    NoProfileAvailable = 402,
    AlreadyAnswered = 403,
    OutOfOrder = 404,

    // Catalog errors (5xx)
    CatalogLoad = 500,
    CatalogMalformed = 501,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E300")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            300..=399 => 30,
            400..=499 => 40,
            500..=599 => 50,
            900..=999 => 90,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the simulator
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Lookup Errors
    // ─────────────────────────────────────────────────────────────

    /// No session with this id exists
    #[error("Session {session_id} not found")]
    SessionNotFound { session_id: String },

    /// Scenario id is not part of the role's catalog
    #[error("Scenario '{scenario_id}' not found for role {role}")]
    ScenarioNotFound { role: Role, scenario_id: String },

    /// Archetype id or name is not part of the role's catalog
    #[error("Archetype '{archetype}' not found for role {role}")]
    ArchetypeNotFound { role: Role, archetype: String },

    // ─────────────────────────────────────────────────────────────
    // Request Errors
    // ─────────────────────────────────────────────────────────────

    /// Choice id is not one of the scenario's choices
    #[error("Invalid choice '{choice_id}' for scenario '{scenario_id}'")]
    InvalidChoice {
        scenario_id: String,
        choice_id: String,
    },

    /// Role has no catalog backing or is disabled by policy
    #[error("Role {role} is not yet supported")]
    UnsupportedRole { role: Role },

    /// Profile requested before it can be produced
    #[error("No profile available: {reason}")]
    NoProfileAvailable { reason: String },

    /// Scenario already has a response in this session
    #[error("Scenario '{scenario_id}' has already been answered")]
    AlreadyAnswered { scenario_id: String },

    /// Scenario is not the session's current one
    #[error(
        "Scenario '{scenario_id}' is out of order, expected {}",
        .expected.as_deref().unwrap_or("none (session is complete)")
    )]
    OutOfOrder {
        scenario_id: String,
        expected: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────
    // Catalog Errors
    // ─────────────────────────────────────────────────────────────

    /// Catalog definition could not be read
    #[error("Failed to load {kind} catalog for role {role}")]
    CatalogLoad {
        kind: &'static str,
        role: Role,
        #[source]
        source: std::io::Error,
    },

    /// Catalog definition is not valid JSON for its schema
    #[error("Malformed {kind} catalog for role {role}")]
    CatalogMalformed {
        kind: &'static str,
        role: Role,
        #[source]
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::SessionNotFound { .. } => ErrorCode::SessionNotFound,
            Error::ScenarioNotFound { .. } => ErrorCode::ScenarioNotFound,
            Error::ArchetypeNotFound { .. } => ErrorCode::ArchetypeNotFound,

            Error::InvalidChoice { .. } => ErrorCode::InvalidChoice,
            Error::UnsupportedRole { .. } => ErrorCode::UnsupportedRole,
            Error::NoProfileAvailable { .. } => ErrorCode::NoProfileAvailable,
            Error::AlreadyAnswered { .. } => ErrorCode::AlreadyAnswered,
            Error::OutOfOrder { .. } => ErrorCode::OutOfOrder,

            Error::CatalogLoad { .. } => ErrorCode::CatalogLoad,
            Error::CatalogMalformed { .. } => ErrorCode::CatalogMalformed,

            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::Config(_) => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Json(_) => ErrorCode::InternalError,
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Whether the caller can fix this by changing its request.
    ///
    /// Everything else is an internal fault and should be reported opaquely.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::SessionNotFound { .. }
                | Error::ScenarioNotFound { .. }
                | Error::ArchetypeNotFound { .. }
                | Error::InvalidChoice { .. }
                | Error::UnsupportedRole { .. }
                | Error::NoProfileAvailable { .. }
                | Error::AlreadyAnswered { .. }
                | Error::OutOfOrder { .. }
        )
    }

    /// Whether this is a lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::SessionNotFound { .. }
                | Error::ScenarioNotFound { .. }
                | Error::ArchetypeNotFound { .. }
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    /// Message safe to hand to a client. Internal faults carry no detail.
    pub fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            "Internal Server Error".to_string()
        }
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::SessionNotFound { .. } => Some(
                "Check the session id. Run 'startup-simulator session create <role>' to start a new one."
            ),
            Error::ScenarioNotFound { .. } | Error::InvalidChoice { .. } => Some(
                "Run 'startup-simulator catalog scenarios <role>' to list valid scenario and choice ids."
            ),
            Error::UnsupportedRole { .. } => Some(
                "Enable the role under [policy] enabled_roles, or pick another role with 'startup-simulator roles'."
            ),
            Error::NoProfileAvailable { .. } => Some(
                "Submit at least one response before requesting a profile."
            ),
            Error::AlreadyAnswered { .. } => Some(
                "Each scenario can be answered once per session. Use 'session state' to see the current scenario."
            ),
            Error::OutOfOrder { .. } => Some(
                "Scenarios are answered in order. Use 'session state' to see the current scenario."
            ),
            Error::CatalogMalformed { .. } => Some(
                "Check the JSON syntax of the catalog files under [catalog] data_dir."
            ),
            Error::ConfigNotFound { .. } => Some(
                "Run 'startup-simulator config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } | Error::Config(_) => Some(
                "Check your configuration file. Run 'startup-simulator config validate' to see details."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            self.code().as_str(),
            self
        );

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn session_not_found(session_id: impl ToString) -> Self {
        Error::SessionNotFound {
            session_id: session_id.to_string(),
        }
    }

    pub fn scenario_not_found(role: Role, scenario_id: impl Into<String>) -> Self {
        Error::ScenarioNotFound {
            role,
            scenario_id: scenario_id.into(),
        }
    }

    pub fn archetype_not_found(role: Role, archetype: impl Into<String>) -> Self {
        Error::ArchetypeNotFound {
            role,
            archetype: archetype.into(),
        }
    }

    pub fn invalid_choice(scenario_id: impl Into<String>, choice_id: impl Into<String>) -> Self {
        Error::InvalidChoice {
            scenario_id: scenario_id.into(),
            choice_id: choice_id.into(),
        }
    }

    pub fn no_profile(reason: impl Into<String>) -> Self {
        Error::NoProfileAvailable {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::ConfigNotFound.as_str(), "E100");
        assert_eq!(ErrorCode::SessionNotFound.as_str(), "E300");
        assert_eq!(ErrorCode::InvalidChoice.as_str(), "E400");
        assert_eq!(ErrorCode::InternalError.as_str(), "E900");
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(ErrorCode::ConfigNotFound.exit_code(), 10);
        assert_eq!(ErrorCode::IoRead.exit_code(), 20);
        assert_eq!(ErrorCode::ScenarioNotFound.exit_code(), 30);
        assert_eq!(ErrorCode::NoProfileAvailable.exit_code(), 40);
        assert_eq!(ErrorCode::CatalogLoad.exit_code(), 50);
        assert_eq!(ErrorCode::InternalError.exit_code(), 90);
    }

    #[test]
    fn test_client_errors_are_distinct() {
        let errors = [
            Error::session_not_found("abc"),
            Error::scenario_not_found(Role::Engineer, "s9"),
            Error::archetype_not_found(Role::Engineer, "nobody"),
            Error::invalid_choice("s1", "not_a_choice"),
            Error::UnsupportedRole { role: Role::Founder },
            Error::no_profile("no responses"),
            Error::AlreadyAnswered {
                scenario_id: "s1".into(),
            },
            Error::OutOfOrder {
                scenario_id: "s2".into(),
                expected: Some("s1".into()),
            },
        ];

        let mut codes: Vec<u16> = errors.iter().map(|e| e.code() as u16).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(errors.iter().all(Error::is_client_error));
    }

    #[test]
    fn test_not_found_classification() {
        assert!(Error::session_not_found("x").is_not_found());
        assert!(Error::scenario_not_found(Role::Engineer, "x").is_not_found());
        assert!(!Error::invalid_choice("s1", "c9").is_not_found());
    }

    #[test]
    fn test_public_message_hides_internal_detail() {
        let err = Error::CatalogLoad {
            kind: "scenario",
            role: Role::Engineer,
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/secret/path"),
        };
        assert!(!err.is_client_error());
        assert_eq!(err.public_message(), "Internal Server Error");

        let err = Error::invalid_choice("s1", "not_a_choice");
        assert!(err.public_message().contains("not_a_choice"));
    }

    #[test]
    fn test_error_suggestions() {
        let err = Error::UnsupportedRole { role: Role::Founder };
        assert!(err.suggestion().unwrap().contains("enabled_roles"));

        assert!(Error::Internal("boom".into()).suggestion().is_none());
    }

    #[test]
    fn test_format_for_terminal() {
        let err = Error::session_not_found("1234");
        let formatted = err.format_for_terminal();

        assert!(formatted.contains("E300"));
        assert!(formatted.contains("\x1b[31m"));
        assert!(formatted.contains("Hint"));
    }

    #[test]
    fn test_format_for_log() {
        let err = Error::invalid_choice("s1", "c9");
        let formatted = err.format_for_log();

        assert!(formatted.contains("[E400]"));
        assert!(!formatted.contains("\x1b["));
    }

    #[test]
    fn test_out_of_order_message() {
        let err = Error::OutOfOrder {
            scenario_id: "s2".into(),
            expected: Some("s1".into()),
        };
        assert_eq!(err.exit_code(), 40);
        assert_eq!(err.to_string(), "Scenario 's2' is out of order, expected s1");
        assert!(err.suggestion().unwrap().contains("session state"));

        let err = Error::OutOfOrder {
            scenario_id: "s1".into(),
            expected: None,
        };
        assert!(err.to_string().contains("session is complete"));
    }

    #[test]
    fn test_io_failures_are_internal() {
        let err = Error::IoWrite {
            path: PathBuf::from("/tmp/session.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.code(), ErrorCode::IoWrite);
        assert_eq!(err.exit_code(), 20);
        assert!(!err.is_client_error());
    }
}
