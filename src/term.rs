//! Affine linear expressions over rational-valued variables.
//!
//! A [`Term`] represents `c + Σ coeff_v · v` for some constant `c` and a
//! sparse map of variable coefficients. No entry with a zero coefficient is
//! ever allowed to persist; every operation that could produce one prunes it
//! on write, so two terms that denote the same expression always compare
//! equal and iterate identically.

use crate::types::Rational;
use std::collections::BTreeMap;
use std::fmt;

use num_traits::{One, Zero};

/// `c + Σ vars[v] * v`.
///
/// `vars` is a `BTreeMap` rather than a `HashMap` so that iteration is always
/// in variable-name order: this is what gives Bland's rule (entering variable
/// selection) and witness output their required determinism, for free.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    c: Rational,
    vars: BTreeMap<String, Rational>,
}

impl Term {
    /// The constant term `c` (no variables).
    pub fn constant(c: Rational) -> Self {
        Term {
            c,
            vars: BTreeMap::new(),
        }
    }

    /// `1 * v`.
    pub fn variable(v: &str) -> Self {
        Term::scalar_var(Rational::one(), v)
    }

    /// `coeff * v`.
    pub fn scalar_var(coeff: Rational, v: &str) -> Self {
        let mut vars = BTreeMap::new();
        if !coeff.is_zero() {
            vars.insert(v.to_string(), coeff);
        }
        Term {
            c: Rational::zero(),
            vars,
        }
    }

    /// `self + other`, pruning any coefficient that cancels to zero.
    pub fn add(&self, other: &Term) -> Term {
        let mut vars = self.vars.clone();
        for (v, coeff) in &other.vars {
            let entry = vars.entry(v.clone()).or_insert_with(Rational::zero);
            *entry += coeff;
        }
        vars.retain(|_, c| !c.is_zero());
        Term {
            c: &self.c + &other.c,
            vars,
        }
    }

    /// `self - other`, pruning any coefficient that cancels to zero.
    pub fn sub(&self, other: &Term) -> Term {
        let mut vars = self.vars.clone();
        for (v, coeff) in &other.vars {
            let entry = vars.entry(v.clone()).or_insert_with(Rational::zero);
            *entry -= coeff;
        }
        vars.retain(|_, c| !c.is_zero());
        Term {
            c: &self.c - &other.c,
            vars,
        }
    }

    /// `self * k`, pruning any coefficient that becomes zero (including every
    /// coefficient, if `k` is zero).
    pub fn scale(&self, k: &Rational) -> Term {
        let mut vars: BTreeMap<String, Rational> = self
            .vars
            .iter()
            .map(|(v, c)| (v.clone(), c * k))
            .collect();
        vars.retain(|_, c| !c.is_zero());
        Term {
            c: &self.c * k,
            vars,
        }
    }

    /// The coefficient of `v`, or zero if `v` does not appear.
    pub fn coeff_of(&self, v: &str) -> Rational {
        self.vars.get(v).cloned().unwrap_or_else(Rational::zero)
    }

    /// The constant term.
    pub fn constant_term(&self) -> &Rational {
        &self.c
    }

    /// Remove `v` from this term and return its coefficient.
    ///
    /// Callers must guarantee `v` is present (this mirrors the pivot
    /// invariant that a caller only ever removes a variable it has just
    /// confirmed has a nonzero coefficient); violating that is a bug in the
    /// caller, not a recoverable error, so this fails fast.
    pub fn remove(&mut self, v: &str) -> Rational {
        self.vars
            .remove(v)
            .unwrap_or_else(|| panic!("Term::remove: `{v}` is not present"))
    }

    /// Replace every occurrence of `old` with `old_coeff * new_term`, where
    /// `old_coeff` is `old`'s coefficient in `self`. No-op if `old` does not
    /// appear.
    pub fn substitute(&mut self, old: &str, new_term: &Term) {
        let Some(old_coeff) = self.vars.remove(old) else {
            return;
        };
        let scaled = new_term.scale(&old_coeff);
        let merged = self.add(&scaled);
        self.c = merged.c;
        self.vars = merged.vars;
    }

    /// `c + Σ vars[v] * sigma[v]`. Every variable referenced by this term
    /// must be present in `sigma`.
    pub fn evaluate(&self, sigma: &BTreeMap<String, Rational>) -> Rational {
        let mut sum = self.c.clone();
        for (v, coeff) in &self.vars {
            let value = sigma
                .get(v)
                .unwrap_or_else(|| panic!("Term::evaluate: `{v}` has no assignment"));
            sum += coeff * value;
        }
        sum
    }

    /// Variables with a strictly positive coefficient, in name order.
    pub fn positive_vars(&self) -> Vec<String> {
        self.vars
            .iter()
            .filter(|(_, c)| **c > Rational::zero())
            .map(|(v, _)| v.clone())
            .collect()
    }

    /// `constant() / coeff_of(v)` if `v` is present with a nonzero
    /// coefficient, else `None` (standing in for `+infinity`).
    pub fn constrain(&self, v: &str) -> Option<Rational> {
        let coeff = self.vars.get(v)?;
        if coeff.is_zero() {
            return None;
        }
        Some(&self.c / coeff)
    }

    /// The variable names appearing in this term (not including the constant).
    pub fn var_names(&self) -> std::collections::BTreeSet<String> {
        self.vars.keys().cloned().collect()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.c.is_zero() || self.vars.is_empty() {
            parts.push(self.c.to_string());
        }
        for (v, coeff) in &self.vars {
            if coeff.is_one() {
                parts.push(v.clone());
            } else {
                parts.push(format!("{coeff} * {v}"));
            }
        }
        write!(f, "{}", parts.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    fn r(n: i64) -> Rational {
        Rational::from_integer(n.into())
    }

    #[test]
    fn add_prunes_cancelling_terms() {
        let a = Term::scalar_var(r(1), "x");
        let b = Term::scalar_var(r(-1), "x");
        let sum = a.add(&b);
        assert_eq!(sum, Term::constant(r(0)));
        assert!(sum.var_names().is_empty());
    }

    #[test]
    fn scale_by_zero_clears_all_vars() {
        let t = Term::scalar_var(r(1), "x").add(&Term::scalar_var(r(2), "y"));
        let scaled = t.scale(&r(0));
        assert_eq!(scaled, Term::constant(r(0)));
    }

    #[test]
    fn substitute_replaces_and_scales() {
        // x + 2*y, substitute y := 3 - x
        let mut t = Term::scalar_var(r(1), "x").add(&Term::scalar_var(r(2), "y"));
        let new_term = Term::constant(r(3)).sub(&Term::scalar_var(r(1), "x"));
        t.substitute("y", &new_term);
        // x + 2*(3 - x) = x + 6 - 2x = 6 - x
        assert_eq!(t.coeff_of("x"), r(-1));
        assert_eq!(t.coeff_of("y"), r(0));
        assert_eq!(*t.constant_term(), r(6));
    }

    #[test]
    fn constrain_is_none_when_absent_or_zero() {
        let t = Term::scalar_var(r(1), "x").add(&Term::constant(r(4)));
        assert!(t.constrain("y").is_none());
    }

    #[test]
    fn evaluate_sums_constant_and_weighted_vars() {
        let t = Term::scalar_var(r(2), "x").add(&Term::constant(r(1)));
        let mut sigma = BTreeMap::new();
        sigma.insert("x".to_string(), r(5));
        assert_eq!(t.evaluate(&sigma), r(11));
    }

    #[test]
    fn positive_vars_sorted_and_filtered() {
        let t = Term::scalar_var(r(1), "b")
            .add(&Term::scalar_var(r(-1), "a"))
            .add(&Term::scalar_var(r(2), "c"));
        assert_eq!(t.positive_vars(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn display_matches_expected_shape() {
        let t = Term::scalar_var(r(1), "x").add(&Term::constant(r(2)));
        assert_eq!(t.to_string(), "2 + x");
    }
}
