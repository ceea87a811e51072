//! A conjunction of atoms, canonicalized once at construction time.

use crate::atom::{Atom, RelOp};
use crate::error::SolveError;
use crate::term::Term;
use crate::types::is_reserved;
use std::collections::BTreeMap;

/// `AND(a_1, ..., a_m)`: the canonicalized atom list plus bookkeeping needed
/// to report a witness back in terms of the original variables.
#[derive(Clone, Debug)]
pub struct Formula {
    atoms: Vec<Atom>,
    /// For each original variable `x`, the term `x_f - x_ff` it was split
    /// into. Used to reconstruct a witness after solving.
    targets: BTreeMap<String, Term>,
    has_strict_ineq: bool,
}

impl Formula {
    /// Build a `Formula` from parsed `(lhs, rhs, op)` triples.
    ///
    /// Rejects any triple mentioning a reserved variable name before doing
    /// any other work. Equality atoms are split into an `Le` and a `Ge`
    /// sub-atom over the same sides (see the crate's REDESIGN FLAGS notes on
    /// why `to_slack` is never asked to canonicalize `RelOp::Eq` directly).
    /// Every other atom is sign-split, slackened, and given its own
    /// auxiliary-bearing slack index, in input order.
    pub fn new(triples: Vec<(Term, Term, RelOp)>) -> Result<Self, SolveError> {
        let mut original_vars = std::collections::BTreeSet::new();
        for (lhs, rhs, _) in &triples {
            original_vars.extend(lhs.var_names());
            original_vars.extend(rhs.var_names());
        }
        for v in &original_vars {
            if is_reserved(v) {
                return Err(SolveError::ReservedName(v.clone()));
            }
        }

        let mut has_strict_ineq = false;
        let mut raw_atoms = Vec::new();
        for (lhs, rhs, op) in triples {
            match op {
                RelOp::Eq => {
                    raw_atoms.push(Atom::new(lhs.clone(), rhs.clone(), RelOp::Le));
                    raw_atoms.push(Atom::new(lhs, rhs, RelOp::Ge));
                }
                _ => {
                    if matches!(op, RelOp::Lt | RelOp::Gt) {
                        has_strict_ineq = true;
                    }
                    raw_atoms.push(Atom::new(lhs, rhs, op));
                }
            }
        }

        let mut atoms = Vec::with_capacity(raw_atoms.len());
        for (i, mut atom) in raw_atoms.into_iter().enumerate() {
            atom.clear_negation();
            atom.to_slack(i + 1);
            atoms.push(atom);
        }

        let targets = original_vars
            .into_iter()
            .map(|x| {
                let split = Term::variable(&format!("{x}_f")).sub(&Term::variable(&format!("{x}_ff")));
                (x, split)
            })
            .collect();

        Ok(Formula {
            atoms,
            targets,
            has_strict_ineq,
        })
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atoms_mut(&mut self) -> &mut Vec<Atom> {
        &mut self.atoms
    }

    pub fn targets(&self) -> &BTreeMap<String, Term> {
        &self.targets
    }

    pub fn has_strict_ineq(&self) -> bool {
        self.has_strict_ineq
    }

    /// Remove the atom at position `i` (see REDESIGN FLAGS: the source's
    /// `atoms.remove(i)` is reproduced here as unambiguous positional
    /// removal, not value search).
    pub fn remove_atom(&mut self, i: usize) -> Atom {
        self.atoms.remove(i)
    }
}
