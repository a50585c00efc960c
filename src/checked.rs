//! Overflow-checked arithmetic and narrowing.
//!
//! Used by the integer bindings and the date codec. Every helper fails with
//! [`Error::OutOfRange`] instead of wrapping.
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, NumCast};

use crate::{Error, Result};

/// Convert between numeric types, checking that no information is lost.
/// Floats are truncated toward zero before the range check.
pub fn cast<T: NumCast, U: NumCast>(v: T) -> Result<U> {
    num_traits::cast(v).ok_or(Error::OutOfRange)
}

/// Checked addition.
pub fn add<T: CheckedAdd>(a: T, b: T) -> Result<T> {
    a.checked_add(&b).ok_or(Error::OutOfRange)
}

/// Checked subtraction.
pub fn sub<T: CheckedSub>(a: T, b: T) -> Result<T> {
    a.checked_sub(&b).ok_or(Error::OutOfRange)
}

/// Checked multiplication.
pub fn mul<T: CheckedMul>(a: T, b: T) -> Result<T> {
    a.checked_mul(&b).ok_or(Error::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing() {
        assert_eq!(cast::<u32, i32>(42).unwrap(), 42);
        assert!(cast::<u32, i32>(1 << 31).is_err());
        assert_eq!(cast::<i64, i16>(-32768).unwrap(), i16::MIN);
        assert!(cast::<i64, i16>(-32769).is_err());
        assert!(cast::<i32, u8>(-1).is_err());
        assert_eq!(cast::<i32, u64>(7).unwrap(), 7u64);
    }

    #[test]
    fn floats_truncate_toward_zero() {
        assert_eq!(cast::<f64, i32>(3.99).unwrap(), 3);
        assert_eq!(cast::<f64, i32>(-3.99).unwrap(), -3);
        assert_eq!(cast::<f32, i64>(-0.5).unwrap(), 0);
        assert!(cast::<f64, i32>(3.0e10).is_err());
        assert!(cast::<f64, i32>(f64::NAN).is_err());
    }

    #[test]
    fn arithmetic() {
        assert_eq!(add(i32::MAX - 1, 1).unwrap(), i32::MAX);
        assert!(add(i32::MAX, 1).is_err());
        assert_eq!(sub(i32::MIN + 1, 1).unwrap(), i32::MIN);
        assert!(sub(i32::MIN, 1).is_err());
        assert_eq!(mul(0i64, i64::MAX).unwrap(), 0);
        assert!(mul(i32::MAX, 2).is_err());
        assert_eq!(mul(-3i32, 7).unwrap(), -21);
    }
}
/* vim: textwidth=80
 */
