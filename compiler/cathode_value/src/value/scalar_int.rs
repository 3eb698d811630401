//! Payload of the script `integer` type.
//!
//! Script integers are 64-bit and overflow is an evaluation error, so the
//! payload has no arithmetic operator impls. The evaluator goes through the
//! `checked_*` family and turns `None` into `IntegerOverflow` (or a
//! division error when the divisor is zero).

use std::fmt;

/// A script integer.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ScalarInt(i64);

impl ScalarInt {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);
    pub const NEG_ONE: Self = Self(-1);

    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Divisor check shared by `/` and `%`.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Float promotion used by Integer/Float equality.
    ///
    /// Values beyond +/-2^53 land on the nearest representable float, so
    /// several integers can equal the same float.
    #[inline]
    #[expect(
        clippy::cast_precision_loss,
        reason = "integer/float comparison is defined by float promotion"
    )]
    pub const fn to_f64(self) -> f64 {
        self.0 as f64
    }
}

macro_rules! checked_ops {
    ($($(#[$attr:meta])* $op:ident;)*) => {
        impl ScalarInt {
            $(
                $(#[$attr])*
                #[inline]
                pub const fn $op(self, rhs: Self) -> Option<Self> {
                    match self.0.$op(rhs.0) {
                        Some(value) => Some(Self(value)),
                        None => None,
                    }
                }
            )*
        }
    };
}

checked_ops! {
    checked_add;
    checked_sub;
    checked_mul;
    /// Truncates toward zero. `None` for a zero divisor and `MIN / -1`.
    checked_div;
    /// Takes the sign of the dividend. `None` for a zero divisor and
    /// `MIN % -1`.
    checked_rem;
}

impl From<i64> for ScalarInt {
    #[inline]
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<ScalarInt> for i64 {
    #[inline]
    fn from(value: ScalarInt) -> Self {
        value.0
    }
}

impl fmt::Debug for ScalarInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for ScalarInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests;
