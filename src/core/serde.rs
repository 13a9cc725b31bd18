/*!
 * Serde Helpers
 * Skip-if helpers for sparse snapshot serialization
 */

/// Skip serializing if value is zero
pub fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

/// Skip serializing if value is false
pub fn is_false(value: &bool) -> bool {
    !value
}
