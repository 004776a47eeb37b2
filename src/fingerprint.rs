// src/fingerprint.rs

//! Content change detection over raw export bytes.
//!
//! Probing the small CSV representation and comparing fingerprints avoids
//! transferring and parsing the full spreadsheet when nothing changed.
//! The digest only needs to be deterministic, not cryptographically
//! meaningful.

use sha2::{Digest, Sha256};

/// Lowercase hex digest of the given bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Whether two fingerprints describe different content.
pub fn has_changed(old: &str, new: &str) -> bool {
    old != new
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let data = b"1;math;301\n2;history;205\n";
        assert_eq!(fingerprint(data), fingerprint(data));
    }

    #[test]
    fn test_sensitive_to_single_byte() {
        let a = fingerprint(b"1;math;301");
        let b = fingerprint(b"1;math;302");
        assert_ne!(a, b);
    }

    #[test]
    fn test_has_changed() {
        assert!(!has_changed("abc", "abc"));
        assert!(has_changed("abc", "abd"));
        // Empty fingerprint from a fresh seed always differs from real content.
        assert!(has_changed("", &fingerprint(b"data")));
    }
}
