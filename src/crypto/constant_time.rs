//! Constant-time comparison for sensitive values (keys, nonces, tags).
//! Use for all comparisons that could leak through timing side channels.

use subtle::ConstantTimeEq;

/// Constant-time equality for 64-byte arrays (MAC tags).
///
/// Naive byte-wise comparison with early exit leaks tag-prefix agreement
/// through timing; this costs the same regardless of where the tags first
/// differ.
#[inline(always)]
pub fn eq_64(a: &[u8; 64], b: &[u8; 64]) -> bool {
    a.ct_eq(b).into()
}
