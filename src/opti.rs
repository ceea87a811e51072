//! The two-phase simplex engine: `evaluate`, pivot selection, and the
//! Phase 1 / Phase 2 drivers built on top of [`crate::atom::Atom`]'s pivot
//! primitives.

use crate::atom::Atom;
use crate::formula::Formula;
use crate::term::Term;
use crate::types::{Rational, AUX, POS};
use num_traits::{One, Zero};
use std::collections::BTreeMap;

/// Outcome of a solve: either infeasible, or satisfiable with a concrete
/// assignment of the original (pre-sign-split) variables.
#[derive(Clone, Debug)]
pub enum Verdict {
    Sat(BTreeMap<String, Rational>),
    Unsat,
}

/// Owns the canonicalized formula, the current objective, and the basic
/// solution implied by the current tableau.
pub struct Opti {
    formula: Formula,
    obj_fun: Term,
    vars: BTreeMap<String, Rational>,
    value: Rational,
}

impl Opti {
    pub fn new(formula: Formula) -> Self {
        Opti {
            formula,
            obj_fun: Term::constant(Rational::zero()),
            vars: BTreeMap::new(),
            value: Rational::zero(),
        }
    }

    /// Recompute `vars` (every non-basic at 0, every basic from its rhs)
    /// and `value` (objective evaluated under that assignment).
    pub fn evaluate(&mut self) {
        for atom in self.formula.atoms() {
            for v in atom.non_basic() {
                self.vars.insert(v, Rational::zero());
            }
        }
        for atom in self.formula.atoms() {
            let basic_value = atom.rhs().evaluate(&self.vars);
            self.vars.insert(atom.basic(), basic_value);
        }
        self.value = self.obj_fun.evaluate(&self.vars);
    }

    /// Run both phases and return the verdict, with witnesses for SAT
    /// results expressed in terms of the original (pre-split) variables.
    pub fn simplex(&mut self) -> Verdict {
        log::info!("phase 1 start");
        let feasible = self.simplex_phase_1();
        log::info!("phase 1 done: feasible={feasible} value={}", self.value);
        if !feasible {
            return Verdict::Unsat;
        }

        if self.formula.has_strict_ineq() {
            log::info!("phase 2 start");
            let has_margin = self.simplex_phase_2();
            log::info!("phase 2 done: has_margin={has_margin} value={}", self.value);
            if !has_margin {
                return Verdict::Unsat;
            }
        }

        self.evaluate();
        let witness = self
            .formula
            .targets()
            .iter()
            .map(|(x, split)| (x.clone(), split.evaluate(&self.vars)))
            .collect();
        Verdict::Sat(witness)
    }

    /// Maximize `-aux`. Returns `true` iff the optimum is zero, i.e. the
    /// original constraints admit a feasible basis.
    fn simplex_phase_1(&mut self) -> bool {
        self.obj_fun = Term::scalar_var(-Rational::one(), AUX);

        let already_feasible = self
            .formula
            .atoms()
            .iter()
            .all(|a| a.rhs().constant_term() >= &Rational::zero());

        if !already_feasible {
            let mut most_negative: Option<(usize, Rational)> = None;
            for (i, atom) in self.formula.atoms().iter().enumerate() {
                if let Some(value) = atom.constrain(AUX) {
                    if most_negative.as_ref().map_or(true, |(_, best)| value < *best) {
                        most_negative = Some((i, value));
                    }
                }
            }
            let (pivot_idx, _) = most_negative.expect("phase 1 prelude: no atom constrains aux");
            log::debug!("phase 1 prelude: pivoting aux into atom {pivot_idx}");
            let new_rhs = self.formula.atoms_mut()[pivot_idx].represent(AUX);
            self.propagate(pivot_idx, AUX, &new_rhs);
        }

        self.simplex_recursive();
        self.value.is_zero()
    }

    /// Maximize `pos`. Returns `true` iff the optimum is strictly positive,
    /// i.e. every strict inequality can be satisfied simultaneously.
    fn simplex_phase_2(&mut self) -> bool {
        self.obj_fun = Term::scalar_var(Rational::one(), POS);
        self.eliminate_aux();
        self.simplex_recursive();
        self.value > Rational::zero()
    }

    /// Scrub `aux` out of the tableau before maximizing `pos`.
    fn eliminate_aux(&mut self) {
        let aux_basic_idx = self.formula.atoms().iter().position(|a| a.basic() == AUX);
        let Some(pivot_idx) = aux_basic_idx else {
            for atom in self.formula.atoms_mut() {
                atom.substitute(AUX, &Term::constant(Rational::zero()));
            }
            return;
        };

        let entering = self.formula.atoms()[pivot_idx]
            .non_basic()
            .into_iter()
            .find(|y| !self.formula.atoms()[pivot_idx].coeff_of(y).is_zero());

        match entering {
            Some(y) => {
                log::debug!("phase 2 prelude: pivoting {y} into atom {pivot_idx} to clear aux");
                let mut propagated = self.formula.atoms_mut()[pivot_idx].represent(&y);
                // The Python source relies on `new` aliasing the pivoted
                // atom's own stored rhs; without that aliasing both copies
                // need the same substitution applied explicitly.
                self.formula.atoms_mut()[pivot_idx].substitute(AUX, &Term::constant(Rational::zero()));
                propagated.substitute(AUX, &Term::constant(Rational::zero()));
                self.propagate(pivot_idx, &y, &propagated);
            }
            None => {
                self.formula.remove_atom(pivot_idx);
            }
        }
    }

    /// Generic maximization pivot loop (Bland's rule on both entering and
    /// leaving selection), restarting after every successful pivot.
    fn simplex_recursive(&mut self) {
        loop {
            self.evaluate();
            let entering_candidates = self.obj_fun.positive_vars();
            if entering_candidates.is_empty() {
                log::info!("pivot loop: optimal at value={}", self.value);
                return;
            }

            let mut pivoted = false;
            for x in &entering_candidates {
                let unbounded = self
                    .formula
                    .atoms()
                    .iter()
                    .all(|a| a.coeff_of(x) >= Rational::zero());

                if unbounded {
                    let x_val = if self.obj_fun.constant_term() <= &Rational::zero() {
                        -self.obj_fun.constant_term().clone() + Rational::one()
                    } else {
                        Rational::zero()
                    };
                    log::debug!("pivot: {x} unbounded, pinning to {x_val}");
                    let x_val_term = Term::constant(x_val);
                    for atom in self.formula.atoms_mut() {
                        atom.substitute(x, &x_val_term);
                    }
                    self.obj_fun.substitute(x, &x_val_term);
                    self.formula.atoms_mut().push(Atom::pinned(x, x_val_term));
                    self.evaluate();
                    return;
                }

                let mut tightest: Option<(usize, Rational)> = None;
                for (i, atom) in self.formula.atoms().iter().enumerate() {
                    if atom.coeff_of(x) >= Rational::zero() {
                        continue;
                    }
                    if let Some(ratio) = atom.constrain(x) {
                        let candidate = -ratio;
                        if candidate >= Rational::zero()
                            && tightest.as_ref().map_or(true, |(_, best)| candidate < *best)
                        {
                            tightest = Some((i, candidate));
                        }
                    }
                }

                if let Some((leaving_idx, _)) = tightest {
                    log::debug!("pivot: entering {x}, leaving atom {leaving_idx}");
                    let new_rhs = self.formula.atoms_mut()[leaving_idx].represent(x);
                    self.propagate(leaving_idx, x, &new_rhs);
                    pivoted = true;
                    break;
                }
            }

            if !pivoted {
                return;
            }
        }
    }

    /// Substitute `var := replacement` into every atom but `pivot_idx`
    /// (which already holds `replacement` as its own rhs) and into the
    /// objective.
    fn propagate(&mut self, pivot_idx: usize, var: &str, replacement: &Term) {
        for (i, atom) in self.formula.atoms_mut().iter_mut().enumerate() {
            if i == pivot_idx {
                continue;
            }
            atom.substitute(var, replacement);
        }
        self.obj_fun.substitute(var, replacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::RelOp;

    fn r(n: i64) -> Rational {
        Rational::from_integer(n.into())
    }

    #[test]
    fn phase_1_is_idempotent_on_already_feasible_input() {
        // x >= 0, trivially feasible at x_f = x_ff = 0.
        let formula = Formula::new(vec![(Term::variable("x"), Term::constant(r(0)), RelOp::Ge)]).unwrap();
        let mut opti = Opti::new(formula);
        match opti.simplex() {
            Verdict::Sat(witness) => assert_eq!(witness["x"], r(0)),
            Verdict::Unsat => panic!("expected SAT"),
        }
    }

    #[test]
    fn detects_unsat_interval() {
        let formula = Formula::new(vec![
            (Term::variable("x"), Term::constant(r(2)), RelOp::Ge),
            (Term::variable("x"), Term::constant(r(1)), RelOp::Le),
        ])
        .unwrap();
        let mut opti = Opti::new(formula);
        assert!(matches!(opti.simplex(), Verdict::Unsat));
    }

    #[test]
    fn solves_feasible_interval() {
        let formula = Formula::new(vec![
            (Term::variable("x"), Term::constant(r(1)), RelOp::Ge),
            (Term::variable("x"), Term::constant(r(2)), RelOp::Le),
        ])
        .unwrap();
        let mut opti = Opti::new(formula);
        match opti.simplex() {
            Verdict::Sat(witness) => {
                let x = &witness["x"];
                assert!(*x >= r(1) && *x <= r(2));
            }
            Verdict::Unsat => panic!("expected SAT"),
        }
    }

    #[test]
    fn strict_inequalities_need_positive_margin() {
        let formula = Formula::new(vec![
            (Term::variable("x"), Term::constant(r(0)), RelOp::Gt),
            (Term::variable("x"), Term::constant(r(0)), RelOp::Lt),
        ])
        .unwrap();
        let mut opti = Opti::new(formula);
        assert!(matches!(opti.simplex(), Verdict::Unsat));
    }
}
