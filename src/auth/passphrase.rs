//! The shared passphrase that guards the app.

use sha2::{Digest, Sha512};

/// The SHA-512 digest of the shared passphrase.
///
/// Only the digest is kept in memory, log-in attempts are compared digest to
/// digest.
#[derive(Clone, PartialEq, Eq)]
pub struct Passphrase {
    digest: Vec<u8>,
}

impl Passphrase {
    /// Hash `passphrase`, returning `None` for an empty passphrase.
    pub fn new(passphrase: &str) -> Option<Self> {
        if passphrase.is_empty() {
            return None;
        }

        Some(Self {
            digest: Sha512::digest(passphrase).to_vec(),
        })
    }

    /// Whether `attempt` is the passphrase.
    pub fn matches(&self, attempt: &str) -> bool {
        Sha512::digest(attempt).as_slice() == self.digest.as_slice()
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passphrase(********)")
    }
}

#[cfg(test)]
mod tests {
    use super::Passphrase;

    #[test]
    fn empty_passphrase_disables_the_gate() {
        assert_eq!(Passphrase::new(""), None);
    }

    #[test]
    fn matches_only_the_passphrase() {
        let passphrase = Passphrase::new("correct horse").unwrap();

        assert!(passphrase.matches("correct horse"));
        assert!(!passphrase.matches("correct horse "));
        assert!(!passphrase.matches(""));
    }

    #[test]
    fn debug_output_hides_digest() {
        let passphrase = Passphrase::new("hunter2").unwrap();

        assert_eq!(format!("{passphrase:?}"), "Passphrase(********)");
    }
}
