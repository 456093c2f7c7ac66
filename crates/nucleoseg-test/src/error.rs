//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building test fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] nucleoseg_core::Error),

    /// A synthetic scene could not be rendered
    #[error("invalid scene: {0}")]
    InvalidScene(String),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
