//! Null/undefined wrappers around a resolved mock value.
//!
//! Both wrappers are identities when their flag is unset: the input value is
//! moved through untouched so output stays byte-stable for snapshot tests.

use crate::mock::MockValue;

/// Randomly yield `null` instead of `value` when `nullable` is set.
pub fn wrap_nullable(value: MockValue, nullable: bool) -> MockValue {
    wrap(value, nullable, MockValue::Null)
}

/// Randomly yield `undefined` instead of `value` when `optional` is set.
pub fn wrap_optional(value: MockValue, optional: bool) -> MockValue {
    wrap(value, optional, MockValue::Undefined)
}

fn wrap(value: MockValue, enabled: bool, alternative: MockValue) -> MockValue {
    if enabled {
        MockValue::one_of(vec![value, alternative])
    } else {
        value
    }
}
