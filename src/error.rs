//! Error types for the Fara'id engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while distributing an estate.

use thiserror::Error;

/// The main error type for the Fara'id engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use faraid_engine::error::EngineError;
///
/// let error = EngineError::UnknownHeirCategory {
///     code: "cousin".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unknown heir category: cousin");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An heir category code is not part of the rule set.
    #[error("Unknown heir category: {code}")]
    UnknownHeirCategory {
        /// The category code that was not recognised.
        code: String,
    },

    /// An heir entry was invalid or inconsistent with the rest of the input.
    #[error("Invalid heir '{category}': {message}")]
    InvalidHeir {
        /// The category code of the offending heir entry.
        category: String,
        /// A description of what made the entry invalid.
        message: String,
    },

    /// An estate figure was invalid.
    #[error("Invalid estate field '{field}': {message}")]
    InvalidEstate {
        /// The estate field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
