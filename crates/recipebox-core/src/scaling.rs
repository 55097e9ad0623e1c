//! # Serving Scale
//!
//! Serving-size adjuster for the recipe detail view.
//!
//! The factor `display / baseline` is kept as an exact ratio and rendered with
//! integer arithmetic only. Ingredient text is never rewritten: the factor is
//! informational.

use crate::primitives::MIN_SERVINGS;
use std::fmt;

/// Baseline and user-chosen serving counts for one recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServingScale {
    baseline: u32,
    display: u32,
}

impl ServingScale {
    /// Start at the recipe's own serving count (factor 1).
    #[must_use]
    pub fn new(baseline: u32) -> Self {
        let baseline = baseline.max(MIN_SERVINGS);
        Self {
            baseline,
            display: baseline,
        }
    }

    /// Start at an explicit serving count, floored at one.
    #[must_use]
    pub fn with_display(baseline: u32, display: u32) -> Self {
        let mut scale = Self::new(baseline);
        scale.set(display);
        scale
    }

    /// Baseline servings of the recipe.
    #[must_use]
    pub fn baseline(&self) -> u32 {
        self.baseline
    }

    /// Servings currently shown.
    #[must_use]
    pub fn display(&self) -> u32 {
        self.display
    }

    /// One more serving.
    pub fn increment(&mut self) {
        self.display = self.display.saturating_add(1);
    }

    /// One fewer serving, never below one.
    pub fn decrement(&mut self) {
        self.display = self.display.saturating_sub(1).max(MIN_SERVINGS);
    }

    /// Set the shown servings, floored at one.
    pub fn set(&mut self, display: u32) {
        self.display = display.max(MIN_SERVINGS);
    }

    /// Reduced numerator of `display / baseline`.
    #[must_use]
    pub fn numerator(&self) -> u32 {
        self.display / gcd(self.display, self.baseline)
    }

    /// Reduced denominator of `display / baseline`.
    #[must_use]
    pub fn denominator(&self) -> u32 {
        self.baseline / gcd(self.display, self.baseline)
    }

    /// Factor in thousandths, rounded half up (integer only, no floats).
    #[must_use]
    pub fn per_thousand(&self) -> u64 {
        let display = u64::from(self.display);
        let baseline = u64::from(self.baseline);
        (display.saturating_mul(1000) + baseline / 2) / baseline
    }

    /// Whether the recipe is shown at its own serving count.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.display == self.baseline
    }
}

impl fmt::Display for ServingScale {
    /// Renders the factor as a short decimal, e.g. `1.5x` or `0.667x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let thousandths = self.per_thousand();
        let whole = thousandths / 1000;
        let fraction = thousandths % 1000;
        if fraction == 0 {
            return write!(f, "{}x", whole);
        }
        let digits = format!("{:03}", fraction);
        write!(f, "{}.{}x", whole, digits.trim_end_matches('0'))
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.max(1)
}

// =============================================================================
// TESTS
// =============================================================================
