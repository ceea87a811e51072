//! Exact-arithmetic two-phase simplex solver for conjunctions of linear
//! rational (in)equality constraints.
//!
//! `solve` is the single public entry point: parse, canonicalize, run the
//! engine, render the verdict.

#[macro_use]
extern crate lalrpop_util;

pub mod atom;
pub mod error;
pub mod formula;
pub mod opti;
pub mod term;
pub mod types;

lalrpop_mod!(
    #[allow(clippy::all)]
    pub grammar
);

use error::SolveError;
use formula::Formula;
use opti::{Opti, Verdict};

/// Parse and solve `formula_text`.
///
/// Returns `Ok("UNSAT")`, or `Ok(...)` with one `x=<rational>` line per
/// original variable sorted by name, or `Err` for a malformed formula or a
/// reserved-variable-name collision.
pub fn solve(formula_text: &str) -> Result<String, SolveError> {
    let triples = grammar::FormulaParser::new()
        .parse(formula_text)
        .map_err(|e| SolveError::Parse(e.to_string()))?;

    let formula = Formula::new(triples)?;
    let mut opti = Opti::new(formula);

    match opti.simplex() {
        Verdict::Unsat => Ok("UNSAT".to_string()),
        Verdict::Sat(witness) => {
            let lines: Vec<String> = witness.iter().map(|(x, v)| format!("{x}={v}")).collect();
            Ok(lines.join("\n"))
        }
    }
}
