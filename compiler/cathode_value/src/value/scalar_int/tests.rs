use super::*;
use pretty_assertions::assert_eq;

fn int(n: i64) -> ScalarInt {
    ScalarInt::new(n)
}

#[test]
fn overflow_at_both_ends() {
    assert_eq!(int(i64::MAX).checked_add(ScalarInt::ONE), None);
    assert_eq!(int(i64::MIN).checked_sub(ScalarInt::ONE), None);
    assert_eq!(int(i64::MIN).checked_mul(ScalarInt::NEG_ONE), None);
    assert_eq!(
        int(i64::MAX).checked_sub(ScalarInt::ONE),
        Some(int(9_223_372_036_854_775_806))
    );
}

#[test]
fn division_rounds_toward_zero() {
    assert_eq!(int(-7).checked_div(int(2)), Some(int(-3)));
    assert_eq!(int(7).checked_div(int(-2)), Some(int(-3)));
    assert_eq!(int(-7).checked_rem(int(2)), Some(int(-1)));
    assert_eq!(int(7).checked_rem(int(-2)), Some(int(1)));
}

#[test]
fn zero_divisor_and_min_by_neg_one() {
    assert!(ScalarInt::ZERO.is_zero());
    assert_eq!(int(5).checked_div(ScalarInt::ZERO), None);
    assert_eq!(int(5).checked_rem(ScalarInt::ZERO), None);
    assert_eq!(int(i64::MIN).checked_div(ScalarInt::NEG_ONE), None);
    assert_eq!(int(i64::MIN).checked_rem(ScalarInt::NEG_ONE), None);
}

#[test]
fn promotion_is_exact_up_to_2_pow_53() {
    let limit = int(9_007_199_254_740_992);
    assert_eq!(limit.to_f64(), 9_007_199_254_740_992.0);
    assert_eq!(int(-9_007_199_254_740_992).to_f64(), -9_007_199_254_740_992.0);
    // 2^53 + 1 has no float of its own.
    assert_eq!(int(9_007_199_254_740_993).to_f64(), limit.to_f64());
}

#[test]
fn formats_as_plain_decimal() {
    assert_eq!(format!("{}", int(-42)), "-42");
    assert_eq!(format!("{:?}", ScalarInt::from(7)), "7");
    assert_eq!(i64::from(int(i64::MIN)), i64::MIN);
}
