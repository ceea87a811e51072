//! A single (in)equality constraint and its canonicalization into slack form.

use crate::term::Term;
use crate::types::{Rational, AUX, POS};
use num_traits::{One, Zero};
use std::collections::BTreeSet;
use std::fmt;

/// The relational operator of an atom, before canonicalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelOp {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Eq => "=",
            RelOp::Ge => ">=",
            RelOp::Gt => ">",
        };
        write!(f, "{symbol}")
    }
}

/// `lhs op rhs`. After canonicalization (`clear_negation` + `to_slack`),
/// `op` is always [`RelOp::Eq`], `lhs` is `1 * basic` for a single basic
/// variable, and `rhs` is a pure linear expression of non-basics.
#[derive(Clone, Debug)]
pub struct Atom {
    lhs: Term,
    rhs: Term,
    op: RelOp,
    /// Original (pre-canonicalization) variables mentioned by this atom.
    targets: BTreeSet<String>,
    strict: bool,
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

impl Atom {
    pub fn new(lhs: Term, rhs: Term, op: RelOp) -> Self {
        let mut targets = lhs.var_names();
        targets.extend(rhs.var_names());
        let strict = matches!(op, RelOp::Lt | RelOp::Gt);
        Atom {
            lhs,
            rhs,
            op,
            targets,
            strict,
        }
    }

    pub fn targets(&self) -> &BTreeSet<String> {
        &self.targets
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn op(&self) -> RelOp {
        self.op
    }

    pub fn rhs(&self) -> &Term {
        &self.rhs
    }

    /// Build a pinning atom `x = x_val` appended by the unbounded-entering
    /// branch of the pivot loop.
    pub fn pinned(x: &str, x_val: Term) -> Self {
        Atom {
            lhs: Term::variable(x),
            rhs: x_val,
            op: RelOp::Eq,
            targets: BTreeSet::new(),
            strict: false,
        }
    }

    /// Substitute `x := x_f - x_ff` for every original variable `x` this
    /// atom mentions, in both sides.
    pub fn clear_negation(&mut self) {
        for x in self.targets.clone() {
            let split = Term::variable(&format!("{x}_f")).sub(&Term::variable(&format!("{x}_ff")));
            self.lhs.substitute(&x, &split);
            self.rhs.substitute(&x, &split);
        }
    }

    /// Rewrite this atom into `s_i = expression + aux`, where `s_i` is a
    /// fresh slack keyed by `index`. Must not be called with `op ==
    /// RelOp::Eq`; equality atoms are split into `Le`/`Ge` sub-atoms before
    /// canonicalization (see `Formula::new`).
    pub fn to_slack(&mut self, index: usize) {
        let slack = Term::variable(&format!("s{index}"));
        match self.op {
            RelOp::Le => {
                self.rhs = self.rhs.sub(&self.lhs);
                self.lhs = slack;
            }
            RelOp::Ge => {
                self.rhs = self.lhs.sub(&self.rhs);
                self.lhs = slack;
            }
            RelOp::Lt => {
                let lhs_plus_pos = self.lhs.add(&Term::variable(POS));
                self.rhs = self.rhs.sub(&lhs_plus_pos);
                self.lhs = slack;
            }
            RelOp::Gt => {
                let lhs_plus_pos = self.lhs.add(&Term::variable(POS));
                self.rhs = lhs_plus_pos.sub(&self.rhs);
                self.lhs = slack;
            }
            RelOp::Eq => unreachable!("equality atoms are split before to_slack is ever called"),
        }
        self.rhs = self.rhs.add(&Term::variable(AUX));
        self.op = RelOp::Eq;
    }

    /// The basic variable name (the sole variable of `lhs`).
    ///
    /// `lhs` is always `1 * basic` post-canonicalization.
    pub fn basic(&self) -> String {
        self.lhs
            .var_names()
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("Atom::basic: lhs `{}` is not a single variable", self.lhs))
    }

    pub fn non_basic(&self) -> BTreeSet<String> {
        self.rhs.var_names()
    }

    pub fn coeff_of(&self, v: &str) -> Rational {
        self.rhs.coeff_of(v)
    }

    pub fn constrain(&self, v: &str) -> Option<Rational> {
        self.rhs.constrain(v)
    }

    /// Make `v` basic in place of the current basic variable. Returns the
    /// new rhs (equal to `self.rhs()` after the call) so the caller can
    /// propagate the substitution elsewhere.
    pub fn represent(&mut self, v: &str) -> Term {
        let alpha = self.rhs.remove(v);
        assert!(!alpha.is_zero(), "Atom::represent: pivot column `{v}` is zero in `{}`", self.rhs);
        let mut new_rhs = self.rhs.sub(&self.lhs);
        let factor = -Rational::one() / alpha;
        new_rhs = new_rhs.scale(&factor);
        self.lhs = Term::variable(v);
        self.rhs = new_rhs.clone();
        new_rhs
    }

    pub fn substitute(&mut self, old: &str, new_term: &Term) {
        self.rhs.substitute(old, new_term);
    }
}
