use std::{
    cmp::Ordering,
    fmt,
    ops::{Div, DivAssign, Mul, MulAssign, Neg},
};

use num_traits::Zero;

use super::EPS;

/// Two-component scalar `a·M + b`, where `M` dominates every finite value a
/// tableau can produce. Objective coefficients of artificial variables carry a
/// non-zero `M` component, so ordinary reduced-cost comparisons drive the
/// artificials out of the basis before the plain coefficients matter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Default,
    derive_more::Add,
    derive_more::Sub,
    derive_more::AddAssign,
    derive_more::SubAssign,
)]
pub struct BigM {
    big_part: f64,
    small_part: f64,
}

impl BigM {
    #[inline(always)]
    pub const fn new(big_part: f64, small_part: f64) -> Self {
        Self {
            big_part,
            small_part,
        }
    }

    pub const fn big_part(&self) -> f64 {
        self.big_part
    }

    pub const fn small_part(&self) -> f64 {
        self.small_part
    }

    pub const fn one_big() -> Self {
        Self {
            big_part: 1.,
            small_part: 0.,
        }
    }

    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match self.big_part.total_cmp(&other.big_part) {
            Ordering::Equal => {}
            ord => return ord,
        }
        self.small_part.total_cmp(&other.small_part)
    }

    /// Strictly negative, with `tolerance` absorbing drift on both components.
    pub fn is_negative(&self, tolerance: f64) -> bool {
        self.big_part < -tolerance
            || (self.big_part.abs() <= tolerance && self.small_part < -tolerance)
    }
}

impl fmt::Display for BigM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.big_part == 0. {
            return write!(f, "{}", self.small_part);
        }
        if self.big_part == 1. {
            write!(f, "M")?;
        } else if self.big_part == -1. {
            write!(f, "-M")?;
        } else {
            write!(f, "{}M", self.big_part)?;
        }
        if self.small_part > 0. {
            write!(f, "+{}", self.small_part)
        } else if self.small_part < 0. {
            write!(f, "{}", self.small_part)
        } else {
            Ok(())
        }
    }
}

impl From<f64> for BigM {
    #[inline]
    fn from(small_part: f64) -> Self {
        Self {
            big_part: 0.,
            small_part,
        }
    }
}

impl TryFrom<BigM> for f64 {
    type Error = String;

    fn try_from(value: BigM) -> Result<Self, Self::Error> {
        if value.big_part.abs() > EPS {
            return Err(format!("the number is too big: {value}"));
        }
        Ok(value.small_part)
    }
}

impl Mul<f64> for BigM {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            big_part: self.big_part * rhs,
            small_part: self.small_part * rhs,
        }
    }
}

impl MulAssign<f64> for BigM {
    fn mul_assign(&mut self, rhs: f64) {
        self.big_part *= rhs;
        self.small_part *= rhs;
    }
}

impl Div<f64> for BigM {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self {
            big_part: self.big_part / rhs,
            small_part: self.small_part / rhs,
        }
    }
}

impl DivAssign<f64> for BigM {
    fn div_assign(&mut self, rhs: f64) {
        self.big_part /= rhs;
        self.small_part /= rhs;
    }
}

impl Neg for BigM {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            big_part: -self.big_part,
            small_part: -self.small_part,
        }
    }
}

impl Zero for BigM {
    fn zero() -> Self {
        Self {
            big_part: 0.,
            small_part: 0.,
        }
    }

    fn is_zero(&self) -> bool {
        self.big_part == 0. && self.small_part == 0.
    }
}

#[cfg(test)]
mod tests {
    use proptest::{prop_assert, prop_assert_eq, proptest};

    use super::*;

    proptest! {
        #[test]
        fn comparison(
            big_part1 in -1000.0..1000.0,
            small_part1 in -1000.0..1000.0,
            big_part2 in -1000.0..1000.0,
            small_part2 in -1000.0..1000.0,
        ) {
            let a = BigM::new(big_part1, small_part1);
            let b = BigM::new(big_part2, small_part2);

            if big_part1 != big_part2 {
                prop_assert_eq!(
                    big_part1.partial_cmp(&big_part2),
                    a.partial_cmp(&b)
                )
            } else {
                prop_assert_eq!(
                    small_part1.partial_cmp(&small_part2),
                    a.partial_cmp(&b)
                )
            }
        }

        #[test]
        fn display(
            big_part in -1000.0..1000.0,
            small_part in -1000.0..1000.0,
        ) {
            let num = BigM::new(big_part, small_part);

            if big_part != 0. && big_part != 1. && big_part != -1. {
                prop_assert_eq!(
                    format!("{big_part}M{}{small_part}", if small_part > 0. { "+" } else { "" }),
                    num.to_string()
                )
            } else if big_part == 0. {
                prop_assert_eq!(small_part.to_string(), num.to_string())
            }
        }

        #[test]
        fn mul(
            big_part in -1000.0..1000.0,
            small_part in -1000.0..1000.0,
            rhs in -1000.0..1000.0,
        ) {
            let num = BigM::new(big_part, small_part);

            prop_assert_eq!(
                num * rhs,
                BigM::new(big_part * rhs, small_part * rhs)
            )
        }

        #[test]
        fn div(
            big_part in -1000.0..1000.0,
            small_part in -1000.0..1000.0,
            rhs in -1000.0..1000.0,
        ) {
            let num = BigM::new(big_part, small_part);

            prop_assert_eq!(
                num / rhs,
                BigM::new(big_part / rhs, small_part / rhs)
            )
        }

        #[test]
        fn big_part_dominates_negativity(
            small_part in -1000.0..1000.0,
        ) {
            prop_assert!(BigM::new(-1., small_part).is_negative(EPS));
            prop_assert!(!BigM::new(1., small_part).is_negative(EPS));
        }
    }

    #[test]
    fn is_negative_respects_tolerance() {
        assert!(BigM::new(0., -1e-3).is_negative(EPS));
        assert!(!BigM::new(0., -1e-12).is_negative(EPS));
        assert!(!BigM::new(0., 1e-3).is_negative(EPS));
    }

    #[test]
    fn conversion_rejects_leftover_big_part() {
        assert_eq!(f64::try_from(BigM::from(2.5)), Ok(2.5));
        assert!(f64::try_from(BigM::new(-1., 3.)).is_err());
    }
}
