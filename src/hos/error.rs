//! Simulator-level errors.

use thiserror::Error;

/// Errors the [`crate::hos::Simulator`] can raise.
///
/// The simulator never raises on a legal HOS situation — every rule
/// violation is resolved by inserting an event. These variants cover only
/// malformed inputs and internal bugs.
#[derive(Debug, Error, PartialEq)]
pub enum SimulatorError {
    /// A caller-supplied argument was out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A defensive invariant check failed — a programming error, not a
    /// reachable regulatory state. The HTTP layer reports this as a 500.
    #[error("internal invariant violated: {0}")]
    Bug(String),
}
