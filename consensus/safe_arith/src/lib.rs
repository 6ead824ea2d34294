//! Checked arithmetic for every balance, slot and index computation in the state
//! machine.
//!
//! `spec.md` never discusses overflow, but every implementation of this spec runs
//! for years against attacker-influenced balances and slot numbers; an unchecked
//! add or a `/ 0` must become a typed `ArithError`, never a silent wrap or a panic,
//! or two implementations can diverge on the same malicious input. `state_processing`
//! and `types` use `SafeArith` for every such computation instead of bare `+`/`-`/`*`/`/`.

use std::fmt;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ArithError {
    Overflow,
    DivisionByZero,
}

impl fmt::Display for ArithError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArithError::Overflow => write!(f, "arithmetic overflow"),
            ArithError::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

impl std::error::Error for ArithError {}

pub trait SafeArith<Rhs = Self>: Sized + Copy {
    const ZERO: Self;
    const ONE: Self;

    fn safe_add(&self, other: Rhs) -> Result<Self, ArithError>;
    fn safe_sub(&self, other: Rhs) -> Result<Self, ArithError>;
    fn safe_mul(&self, other: Rhs) -> Result<Self, ArithError>;
    fn safe_div(&self, other: Rhs) -> Result<Self, ArithError>;
    fn safe_rem(&self, other: Rhs) -> Result<Self, ArithError>;

    fn safe_add_assign(&mut self, other: Rhs) -> Result<(), ArithError> {
        *self = self.safe_add(other)?;
        Ok(())
    }

    fn safe_sub_assign(&mut self, other: Rhs) -> Result<(), ArithError> {
        *self = self.safe_sub(other)?;
        Ok(())
    }
}

macro_rules! impl_safe_arith {
    ($typ:ty) => {
        impl SafeArith for $typ {
            const ZERO: Self = 0;
            const ONE: Self = 1;

            fn safe_add(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_add(other).ok_or(ArithError::Overflow)
            }

            fn safe_sub(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_sub(other).ok_or(ArithError::Overflow)
            }

            fn safe_mul(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_mul(other).ok_or(ArithError::Overflow)
            }

            fn safe_div(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_div(other).ok_or(ArithError::DivisionByZero)
            }

            fn safe_rem(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_rem(other).ok_or(ArithError::DivisionByZero)
            }
        }
    };
}

impl_safe_arith!(u64);
impl_safe_arith!(u32);
impl_safe_arith!(u16);
impl_safe_arith!(usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_add_overflow() {
        assert_eq!(u64::max_value().safe_add(1), Err(ArithError::Overflow));
        assert_eq!(1_u64.safe_add(1).unwrap(), 2);
    }

    #[test]
    fn test_safe_sub_underflow() {
        assert_eq!(0_u64.safe_sub(1), Err(ArithError::Overflow));
        assert_eq!(5_u64.safe_sub(2).unwrap(), 3);
    }

    #[test]
    fn test_safe_div_by_zero() {
        assert_eq!(5_u64.safe_div(0), Err(ArithError::DivisionByZero));
        assert_eq!(6_u64.safe_div(2).unwrap(), 3);
    }

    #[test]
    fn test_safe_add_assign() {
        let mut x: u64 = 1;
        x.safe_add_assign(41).unwrap();
        assert_eq!(x, 42);
    }
}
