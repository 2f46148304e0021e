use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GamvResult<T> = Result<T, GamvError>;
pub type ConfigResult<T> = GamvResult<T>;
pub type ParseResult<T> = GamvResult<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamvErrorCategory {
    ConfigurationError,
    EngineFailure,
    ParseFailure,
    IoSystemError,
}

impl GamvErrorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigurationError => "ConfigurationError",
            Self::EngineFailure => "EngineFailure",
            Self::ParseFailure => "ParseFailure",
            Self::IoSystemError => "IoSystemError",
        }
    }

    /// Whether the caller can recover by correcting its own input.
    pub const fn is_caller_fixable(self) -> bool {
        matches!(self, Self::ConfigurationError)
    }
}

impl Display for GamvErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamvError {
    category: GamvErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl GamvError {
    pub fn new(
        category: GamvErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn configuration(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(GamvErrorCategory::ConfigurationError, placeholder, message)
    }

    pub fn engine_failure(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(GamvErrorCategory::EngineFailure, placeholder, message)
    }

    pub fn parse_failure(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(GamvErrorCategory::ParseFailure, placeholder, message)
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(GamvErrorCategory::IoSystemError, placeholder, message)
    }

    pub const fn category(&self) -> GamvErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }
}

impl Display for GamvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category, self.placeholder, self.message
        )
    }
}

impl Error for GamvError {}
