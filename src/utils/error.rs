use thiserror::Error;

#[derive(Error, Debug)]
pub enum WirelessError {
    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("{message}")]
    Driver { message: String },

    #[error("Command '{command}' failed: {message}")]
    CommandError { command: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Radio,
    System,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WirelessError {
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::Driver { .. } | Self::CommandError { .. } => ErrorCategory::Radio,
            Self::IoError(_) => ErrorCategory::System,
            Self::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SerializationError(_) => ErrorSeverity::Low,
            Self::Driver { .. } => ErrorSeverity::Medium,
            Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::TomlError(_) => ErrorSeverity::High,
            Self::CommandError { .. } | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidConfigValueError { .. } => {
                "Check the value against the allowed range and try again"
            }
            Self::MissingConfigError { .. } => {
                "Provide the value on the command line or in the config file"
            }
            Self::ConfigValidationError { .. } | Self::TomlError(_) => {
                "Fix the configuration file syntax and field types"
            }
            Self::Driver { .. } => "Verify the network password and that the access point is in range",
            Self::CommandError { .. } => {
                "Make sure NetworkManager is running and nmcli is on PATH"
            }
            Self::IoError(_) => "Check file permissions and paths",
            Self::SerializationError(_) => "Retry without --json",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            Self::MissingConfigError { field } => format!("Setting '{}' is required", field),
            Self::Driver { message } => format!("The radio rejected the request: {}", message),
            Self::CommandError { command, .. } => {
                format!("Could not talk to the network manager ({})", command)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WirelessError>;
