use subtle::ConstantTimeEq;

/// Compare a caller-supplied API key against the configured secret.
///
/// The comparison is constant-time so response latency does not leak
/// key bytes. Mismatched lengths compare unequal without branching on
/// content.
pub fn verify_api_key(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
