//! Algorithm identifiers carried in the signature trailer.
//!
//! Both the public-key algorithm and the digest are encoded as single bytes.
//! They are modelled as closed enums so that adding an algorithm forces every
//! `match` over them to be revisited.

use std::fmt;

/// Digest algorithm named by the trailer `hash` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-1 (id 0)
    Sha1,
    /// SHA-224 (id 1)
    Sha224,
    /// SHA-256 (id 2)
    Sha256,
    /// SHA-384 (id 3)
    Sha384,
    /// SHA-512 (id 4)
    Sha512,
}

impl HashAlgorithm {
    /// Every supported digest, in id order.
    pub const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    /// Decode a trailer hash id.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(HashAlgorithm::Sha1),
            1 => Some(HashAlgorithm::Sha224),
            2 => Some(HashAlgorithm::Sha256),
            3 => Some(HashAlgorithm::Sha384),
            4 => Some(HashAlgorithm::Sha512),
            _ => None,
        }
    }

    /// The trailer hash id for this digest.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            HashAlgorithm::Sha1 => 0,
            HashAlgorithm::Sha224 => 1,
            HashAlgorithm::Sha256 => 2,
            HashAlgorithm::Sha384 => 3,
            HashAlgorithm::Sha512 => 4,
        }
    }

    /// Lowercase name, as reported in verification results.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Length in bytes of the raw digest output.
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Public-key algorithm family named by the trailer `algo` byte.
///
/// The byte does not carry a padding mode. RSA signatures are always
/// PKCS#1 v1.5; a different padding needs a new trailer revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// RSA with PKCS#1 v1.5 padding (id 0)
    Rsa,
}

impl SignatureAlgorithm {
    /// Decode a trailer algorithm id.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(SignatureAlgorithm::Rsa),
            _ => None,
        }
    }

    /// The trailer algorithm id.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            SignatureAlgorithm::Rsa => 0,
        }
    }

    /// Lowercase name, as reported in verification results.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SignatureAlgorithm::Rsa => "rsa",
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_ids_roundtrip() {
        for hash in HashAlgorithm::ALL {
            assert_eq!(HashAlgorithm::from_id(hash.id()), Some(hash));
        }
    }

    #[test]
    fn test_hash_ids_are_closed() {
        for id in 5..=u8::MAX {
            assert_eq!(HashAlgorithm::from_id(id), None, "id {id} must be rejected");
        }
    }

    #[test]
    fn test_hash_names_and_lengths() {
        let expected = [
            ("sha1", 20),
            ("sha224", 28),
            ("sha256", 32),
            ("sha384", 48),
            ("sha512", 64),
        ];
        for (hash, (name, len)) in HashAlgorithm::ALL.iter().zip(expected) {
            assert_eq!(hash.name(), name);
            assert_eq!(hash.digest_len(), len);
            assert_eq!(hash.to_string(), name);
        }
    }

    #[test]
    fn test_signature_algorithm_ids() {
        assert_eq!(SignatureAlgorithm::from_id(0), Some(SignatureAlgorithm::Rsa));
        assert_eq!(SignatureAlgorithm::from_id(1), None);
        assert_eq!(SignatureAlgorithm::Rsa.name(), "rsa");
        assert_eq!(SignatureAlgorithm::Rsa.id(), 0);
    }
}
