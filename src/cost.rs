//! Costs of search nodes.

use crate::error::SearchError;
use num_traits::Zero;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;

/// Trait for costs associated with search nodes.
///
/// A cost is a totally ordered value supporting addition, where zero is the additive identity.
/// Addition must be associative and isotone, i.e., a ≤ b → a + c ≤ b + c.
///
/// Every type satisfying the bounds is a cost, so primitive integers can be used directly.
/// Costs with several levels of granularity (e.g., a lexicographic pair where the first component always
/// dominates the second) only need to implement the standard traits.
///
/// # Examples
///
/// ```
/// use statespace_search::prelude::*;
/// use num_traits::Zero;
/// use std::ops::Add;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// struct Lexicographic {
///     violations: u32,
///     distance: u32,
/// }
///
/// impl Add for Lexicographic {
///     type Output = Self;
///
///     fn add(self, rhs: Self) -> Self {
///         Self {
///             violations: self.violations + rhs.violations,
///             distance: self.distance + rhs.distance,
///         }
///     }
/// }
///
/// impl Zero for Lexicographic {
///     fn zero() -> Self {
///         Self { violations: 0, distance: 0 }
///     }
///
///     fn is_zero(&self) -> bool {
///         self.violations == 0 && self.distance == 0
///     }
/// }
///
/// fn assert_cost<C: Cost>() {}
/// assert_cost::<Lexicographic>();
/// assert_cost::<i64>();
/// assert_cost::<FloatCost>();
/// ```
pub trait Cost: Copy + Ord + Add<Output = Self> + Zero + fmt::Debug {}

impl<T> Cost for T where T: Copy + Ord + Add<Output = T> + Zero + fmt::Debug {}

/// Floating-point cost.
///
/// NaN is rejected on construction, which makes the order total.
/// Infinite values are allowed and can serve as unbounded cost bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatCost(f64);

impl FloatCost {
    pub const ZERO: Self = Self(0.0);
    pub const MAX: Self = Self(f64::MAX);
    pub const INFINITY: Self = Self(f64::INFINITY);
    pub const NEG_INFINITY: Self = Self(f64::NEG_INFINITY);

    /// Creates a cost from the given value.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UndefinedCost`] if `value` is NaN.
    pub fn new(value: f64) -> Result<Self, SearchError> {
        if value.is_nan() {
            Err(SearchError::UndefinedCost)
        } else {
            Ok(Self::normalized(value))
        }
    }

    /// Returns the wrapped value.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns `true` if the cost is neither infinite nor NaN.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[inline]
    fn normalized(value: f64) -> Self {
        // -0.0 and 0.0 must compare equal under total_cmp
        if value == 0.0 {
            Self(0.0)
        } else {
            Self(value)
        }
    }
}

impl TryFrom<f64> for FloatCost {
    type Error = SearchError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FloatCost> for f64 {
    fn from(cost: FloatCost) -> Self {
        cost.0
    }
}

impl PartialEq for FloatCost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatCost {}

impl PartialOrd for FloatCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatCost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for FloatCost {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Adds two costs.
///
/// The sum of positive and negative infinity saturates to [`FloatCost::INFINITY`], so a cost never holds NaN.
impl Add for FloatCost {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let sum = self.0 + rhs.0;

        if sum.is_nan() {
            Self::INFINITY
        } else {
            Self::normalized(sum)
        }
    }
}

impl Zero for FloatCost {
    #[inline]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for FloatCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
