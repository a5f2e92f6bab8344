//! Integer percentage scaling with an exact inverse.
//!
//! Applying `+p%` rounds up and removing it rounds down, so for every
//! `p >= 0` and every `v`, `unscale(scale(v, p), p) == v`. Intermediate
//! products are computed in `i64` to avoid overflow.

/// `v * (100 + p) / 100`, rounded toward positive infinity.
pub fn scale(v: i32, percent: i32) -> i32 {
    let numerator = i64::from(v) * (100 + i64::from(percent));
    let mut quotient = numerator.div_euclid(100);
    if numerator.rem_euclid(100) != 0 {
        quotient += 1;
    }
    saturate(quotient)
}

/// `v * 100 / (100 + p)`, rounded toward negative infinity.
///
/// `percent` must be greater than -100; catalog linking rejects anything else.
pub fn unscale(v: i32, percent: i32) -> i32 {
    let denominator = 100 + i64::from(percent);
    if denominator <= 0 {
        return v;
    }
    saturate((i64::from(v) * 100).div_euclid(denominator))
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scales_like_the_plain_formula_when_divisible() {
        assert_eq!(scale(200, 10), 220);
        assert_eq!(unscale(220, 10), 200);
        assert_eq!(scale(50, -50), 25);
    }

    #[test]
    fn rounds_up_on_apply_and_down_on_remove() {
        assert_eq!(scale(7, 10), 8);
        assert_eq!(unscale(8, 10), 7);
        assert_eq!(scale(-7, 10), -7);
        assert_eq!(unscale(-7, 10), -7);
    }

    proptest! {
        #[test]
        fn prop_unscale_inverts_scale(v in -1_000_000i32..1_000_000, p in 0i32..500) {
            prop_assert_eq!(unscale(scale(v, p), p), v);
        }

        #[test]
        fn prop_nested_percentages_unwind_in_reverse(
            v in 0i32..100_000,
            p1 in 0i32..200,
            p2 in 0i32..200,
        ) {
            let applied = scale(scale(v, p1), p2);
            prop_assert_eq!(unscale(unscale(applied, p2), p1), v);
        }
    }
}
