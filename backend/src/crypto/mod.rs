//! Contact phone number encryption
//!
//! Emergency contact numbers are stored encrypted at rest with AES-256-GCM
//! and decrypted on read. The envelope format is `iv:tag:ciphertext`, each
//! segment lowercase hex.
//!
//! Decryption is deliberately forgiving: values that are not a three-segment
//! envelope are returned unchanged (legacy plaintext rows predate the
//! cipher), and a failed decrypt yields `None` so callers treat the contact
//! as unreachable by SMS instead of crashing an emergency dispatch.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use anyhow::{anyhow, Result};
use sha2::{Digest, Sha256};

/// GCM nonce length in bytes
const NONCE_LEN: usize = 12;
/// GCM authentication tag length in bytes
const TAG_LEN: usize = 16;

/// Authenticated symmetric cipher for contact phone numbers
///
/// The key is derived once from the configured secret (SHA-256 stretch to
/// the cipher's 32-byte key length); construct this at startup and share it.
#[derive(Clone)]
pub struct PhoneCipher {
    cipher: Aes256Gcm,
}

impl PhoneCipher {
    /// Derive the cipher key from a server-held secret
    pub fn new(secret: &str) -> Self {
        let key = Sha256::digest(secret.as_bytes());
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
        Self { cipher }
    }

    /// Encrypt a plaintext phone number into an `iv:tag:ciphertext` envelope
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| anyhow!("phone number encryption failed"))?;

        // aes-gcm appends the tag to the ciphertext
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);
        Ok(format!(
            "{}:{}:{}",
            hex::encode(nonce),
            hex::encode(tag),
            hex::encode(ciphertext)
        ))
    }

    /// Decrypt an envelope produced by [`encrypt`](Self::encrypt)
    ///
    /// Returns the input unchanged when it is not a three-segment envelope
    /// (legacy unencrypted rows). Returns `None` when the envelope is
    /// malformed or fails authentication.
    pub fn decrypt(&self, envelope: &str) -> Option<String> {
        let parts: Vec<&str> = envelope.split(':').collect();
        if parts.len() != 3 {
            return Some(envelope.to_string());
        }

        let iv = hex::decode(parts[0]).ok()?;
        let tag = hex::decode(parts[1]).ok()?;
        let ciphertext = hex::decode(parts[2]).ok()?;
        if iv.len() != NONCE_LEN || tag.len() != TAG_LEN {
            return None;
        }

        let mut sealed = ciphertext;
        sealed.extend_from_slice(&tag);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&iv), sealed.as_ref())
            .ok()?;
        String::from_utf8(plaintext).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> PhoneCipher {
        PhoneCipher::new("unit-test-secret")
    }

    #[test]
    fn test_round_trip() {
        let cipher = cipher();
        for number in ["+919876543210", "09876543210", "(617) 555-0133", "näöü"] {
            let envelope = cipher.encrypt(number).unwrap();
            assert_eq!(cipher.decrypt(&envelope).as_deref(), Some(number));
        }
    }

    #[test]
    fn test_envelope_format() {
        let envelope = cipher().encrypt("+919876543210").unwrap();
        let parts: Vec<&str> = envelope.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(hex::decode(parts[0]).unwrap().len(), NONCE_LEN);
        assert_eq!(hex::decode(parts[1]).unwrap().len(), TAG_LEN);
        assert!(!parts[2].is_empty());
    }

    #[test]
    fn test_random_nonce_gives_distinct_envelopes() {
        let cipher = cipher();
        let a = cipher.encrypt("+919876543210").unwrap();
        let b = cipher.encrypt("+919876543210").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_legacy_plaintext_passes_through() {
        assert_eq!(
            cipher().decrypt("9876543210").as_deref(),
            Some("9876543210")
        );
        // two segments is not an envelope either
        assert_eq!(cipher().decrypt("ab:cd").as_deref(), Some("ab:cd"));
    }

    #[test]
    fn test_tampered_tag_returns_none() {
        let cipher = cipher();
        let envelope = cipher.encrypt("+919876543210").unwrap();
        let mut parts: Vec<String> = envelope.split(':').map(String::from).collect();
        // flip the first byte of the auth tag
        let flipped = if parts[1].starts_with("00") { "01" } else { "00" };
        parts[1].replace_range(0..2, flipped);
        assert_eq!(cipher.decrypt(&parts.join(":")), None);
    }

    #[test]
    fn test_malformed_envelope_returns_none() {
        let cipher = cipher();
        assert_eq!(cipher.decrypt("zz:zz:zz"), None);
        assert_eq!(cipher.decrypt("ab:cd:ef"), None);
    }

    #[test]
    fn test_wrong_key_returns_none() {
        let envelope = PhoneCipher::new("key-a").encrypt("+919876543210").unwrap();
        assert_eq!(PhoneCipher::new("key-b").decrypt(&envelope), None);
    }
}
