//! Address derivation for the code-smell family

use sha2::{Digest, Sha512};
use smelter_core::StateAddress;

/// Length of the per-entity hash suffix in hex characters
const SUFFIX_LEN: usize = StateAddress::LEN - StateAddress::PREFIX_LEN;

fn sha512_hex(data: &[u8]) -> String {
    hex::encode(Sha512::digest(data))
}

/// Namespace prefix for a family: the first 6 hex characters of the SHA-512
/// digest of its well-known name.
///
/// The handler derives this once at construction and reuses it for every
/// address computation afterwards.
pub fn namespace_prefix(family_name: &str) -> String {
    sha512_hex(family_name.as_bytes())[..StateAddress::PREFIX_LEN].to_string()
}

/// Derive the storage address of an entity name within a namespace.
///
/// Pure and total: equal names always map to equal addresses, and distinct
/// names collide only on a SHA-512 prefix collision.
pub fn make_address(namespace: &str, name: &str) -> StateAddress {
    let digest = sha512_hex(name.as_bytes());
    StateAddress::new(format!("{}{}", namespace, &digest[..SUFFIX_LEN]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_prefix_shape() {
        let prefix = namespace_prefix("code-smell");
        assert_eq!(prefix.len(), StateAddress::PREFIX_LEN);
        assert!(prefix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_prefix_depends_on_family_name() {
        assert_ne!(namespace_prefix("code-smell"), namespace_prefix("intkey"));
    }

    #[test]
    fn test_address_is_deterministic() {
        let prefix = namespace_prefix("code-smell");
        assert_eq!(make_address(&prefix, "widget"), make_address(&prefix, "widget"));
    }

    #[test]
    fn test_address_shape() {
        let prefix = namespace_prefix("code-smell");
        let address = make_address(&prefix, "widget");
        assert_eq!(address.as_str().len(), StateAddress::LEN);
        assert_eq!(address.prefix(), prefix);
    }

    #[test]
    fn test_no_collisions_over_large_corpus() {
        let prefix = namespace_prefix("code-smell");
        let mut seen = HashSet::new();
        for i in 0..10_000 {
            let address = make_address(&prefix, &format!("entity-{}", i));
            assert!(seen.insert(address), "collision at entity-{}", i);
        }
    }
}
