use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a parse finding.
///
/// Identity fields:
/// - check_id
/// - code
/// - file path (repo-relative)
/// - node identity (label and coordinates; empty for file-level findings)
pub fn fingerprint_for_record(check_id: &str, code: &str, path: &str, node: &str) -> String {
    let canonical = [check_id, code, path, node].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_field_sensitive() {
        let raw = "a.js (ERROR [0, 0] - [0, 1])";
        let a = fingerprint_for_record("syntax.parse", "parse_error", "a.js", raw);
        let b = fingerprint_for_record("syntax.parse", "parse_error", "a.js", raw);
        let c = fingerprint_for_record("syntax.parse", "parse_error", "b.js", raw);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
