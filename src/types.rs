//! Shared numeric and naming types used across the crate.

pub use num_bigint::BigInt;
pub use num_rational::BigRational;
pub use num_traits::{One, Zero};

/// Exact rational used throughout the solver. Always kept in lowest terms by
/// `num-rational`'s own constructors and arithmetic impls.
pub type Rational = BigRational;

/// Variable used to drive Phase 1 (auxiliary feasibility).
pub const AUX: &str = "aux";

/// Variable used in Phase 2 to witness strict inequalities.
pub const POS: &str = "pos";

/// `true` if `name` collides with a name the engine synthesizes internally
/// (`aux`, `pos`, `s<digits>`, `<v>_f`, `<v>_ff`).
pub fn is_reserved(name: &str) -> bool {
    if name == AUX || name == POS {
        return true;
    }
    if name.ends_with("_f") || name.ends_with("_ff") {
        return true;
    }
    if let Some(rest) = name.strip_prefix('s') {
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
    }
    false
}
