use thiserror::Error;

#[derive(Error, Debug)]
pub enum RentalError {
    #[error("Invalid license plate: {plate}")]
    InvalidPlate { plate: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("A {kind} needs --{argument}")]
    MissingArgument { kind: String, argument: String },

    #[error("No vehicle with plate {plate}")]
    VehicleNotFound { plate: String },

    #[error("No customer with id {id}")]
    CustomerNotFound { id: i32 },

    #[error("{action} rejected for {plate}: vehicle is {status}")]
    TransitionRejected {
        action: String,
        plate: String,
        status: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    State,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RentalError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RentalError::InvalidPlate { .. }
            | RentalError::MissingArgument { .. }
            | RentalError::VehicleNotFound { .. }
            | RentalError::CustomerNotFound { .. } => ErrorCategory::Input,
            RentalError::TransitionRejected { .. } => ErrorCategory::State,
            RentalError::IoError(_) | RentalError::SerializationError(_) => ErrorCategory::Storage,
            RentalError::ConfigValidationError { .. }
            | RentalError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RentalError::TransitionRejected { .. } => ErrorSeverity::Medium,
            RentalError::InvalidPlate { .. }
            | RentalError::MissingArgument { .. }
            | RentalError::VehicleNotFound { .. }
            | RentalError::CustomerNotFound { .. }
            | RentalError::ConfigValidationError { .. }
            | RentalError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            RentalError::IoError(_) | RentalError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RentalError::InvalidPlate { .. } => {
                "Use 2 to 8 letters or digits, without spaces or punctuation"
            }
            RentalError::MissingArgument { .. } => {
                "Run `add-vehicle --help` for the flags each kind needs"
            }
            RentalError::VehicleNotFound { .. } => {
                "List vehicles with the `vehicles` command and check the plate"
            }
            RentalError::CustomerNotFound { .. } => {
                "List customers with the `customers` command and check the id"
            }
            RentalError::TransitionRejected { .. } => {
                "Only available vehicles can be rented and only rented vehicles returned"
            }
            RentalError::IoError(_) => "Check that the data directory exists and is writable",
            RentalError::SerializationError(_) => "Retry with --format table",
            RentalError::ConfigValidationError { .. }
            | RentalError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RentalError::IoError(e) => format!("Could not access the data files ({})", e),
            RentalError::TransitionRejected {
                action,
                plate,
                status,
            } => format!("Cannot {} {}: it is currently {}", action, plate, status),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RentalError>;
