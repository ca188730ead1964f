//! Error handling for the dashboard
//!
//! The refresh pipeline itself never fails: invalid indices, missing samples
//! and unsupported FFT sizes degrade to "do nothing this cycle". These error
//! types cover the outer surfaces instead (configuration, theme loading and
//! the frame channel).

use thiserror::Error;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to theme files
    #[error("Theme error: {0}")]
    Theme(String),

    /// A color string could not be parsed
    #[error("Invalid color {0:?}")]
    InvalidColor(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DashboardError>,
    },
}

impl DashboardError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DashboardError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DashboardError {
    fn from(err: toml::de::Error) -> Self {
        DashboardError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for DashboardError {
    fn from(err: toml::ser::Error) -> Self {
        DashboardError::Serialization(err.to_string())
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<DashboardError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
