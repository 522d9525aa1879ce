use aes_gcm::aead::{rand_core::RngCore, Aead, OsRng};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Application-wide KDF salt. Fixed so two operators with the same
/// passphrase derive the same key and can read each other's blobs.
const KDF_SALT: &[u8; 16] = b"flexform.kdf.v1\0";
const PBKDF2_ITERATIONS: u32 = 100_000;
const NONCE_LEN: usize = 12;

/// Derives the AEAD key and encrypts/decrypts the protected contact
/// values. Blob layout: base64(nonce || ciphertext), fresh random nonce
/// per call.
pub struct KeyManager {
    key: [u8; 32],
}

impl KeyManager {
    pub fn from_passphrase(passphrase: &str) -> Self {
        KeyManager {
            key: derive_key(passphrase),
        }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|err| Error::Decryption(err.to_string()))?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|err| Error::Decryption(err.to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(B64.encode(blob))
    }

    /// Fails with a recoverable `Decryption` error on a wrong passphrase or
    /// tampered blob. Callers surface this as a re-prompt, not a crash.
    pub fn decrypt(&self, blob: &str) -> Result<String> {
        let raw = B64
            .decode(blob)
            .map_err(|_| Error::Decryption("Blob is not valid base64".to_string()))?;
        if raw.len() <= NONCE_LEN {
            return Err(Error::Decryption("Blob too short".to_string()));
        }
        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);

        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|err| Error::Decryption(err.to_string()))?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| Error::Decryption("Wrong passphrase or tampered data".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| Error::Decryption("Decrypted bytes are not UTF-8".to_string()))
    }
}

fn derive_key(passphrase: &str) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), KDF_SALT, PBKDF2_ITERATIONS, &mut key);
    key
}

/// SHA-256 hex digest used as an equality-lookup companion to an encrypted
/// column. Not reversible, unlike the "simple encrypt" the legacy import
/// script shipped with.
pub fn lookup_hash(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_passphrase_round_trips() {
        let keys = KeyManager::from_passphrase("correct horse");
        let blob = keys.encrypt("organizer@example.com").unwrap();
        assert_eq!(keys.decrypt(&blob).unwrap(), "organizer@example.com");
    }

    #[test]
    fn wrong_passphrase_is_a_decryption_error() {
        let sender = KeyManager::from_passphrase("p1");
        let receiver = KeyManager::from_passphrase("p2");
        let blob = sender.encrypt("secret").unwrap();
        assert!(matches!(receiver.decrypt(&blob), Err(Error::Decryption(_))));
    }

    #[test]
    fn tampered_blob_fails_authentication() {
        let keys = KeyManager::from_passphrase("p1");
        let blob = keys.encrypt("secret").unwrap();
        let mut raw = B64.decode(&blob).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = B64.encode(raw);
        assert!(matches!(keys.decrypt(&tampered), Err(Error::Decryption(_))));
    }

    #[test]
    fn nonce_is_fresh_per_call() {
        let keys = KeyManager::from_passphrase("p1");
        let first = keys.encrypt("same plaintext").unwrap();
        let second = keys.encrypt("same plaintext").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn lookup_hash_is_stable_hex() {
        let digest = lookup_hash("organizer@example.com");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, lookup_hash("organizer@example.com"));
    }
}
