//! Error taxonomy for the public entry point.
//!
//! Only conditions that can arise from untrusted input (the surface grammar,
//! or a caller-supplied variable name) are represented here. Internal
//! invariant violations (a pivot column with no nonzero entry, a term
//! referencing an unassigned variable) are bugs, not `SolveError`s, and are
//! reported via `panic!`/`.expect()` where they occur.

use thiserror::Error;

/// Everything that can go wrong turning surface text into a solved formula.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The surface grammar rejected the input.
    #[error("parse error: {0}")]
    Parse(String),

    /// The input named a variable the engine reserves for its own use
    /// (`aux`, `pos`, `s<digits>`, `<v>_f`, `<v>_ff`).
    #[error("reserved variable name: `{0}`")]
    ReservedName(String),
}
