use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

const NONCE_LEN: usize = 12;

/// Symmetric cipher used for logged message bodies.
///
/// Payloads are stored as base64 of `nonce || ciphertext`, with a fresh nonce for
/// every encryption.
#[derive(Clone)]
pub struct MessageCipher {
    cipher: Aes256Gcm,
}

impl MessageCipher {
    pub fn new(key: &[u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Build a cipher from a base64 encoded 256-bit key.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(encoded.trim())
            .context("Message key is not valid base64")?;
        let key: [u8; 32] = bytes
            .try_into()
            .map_err(|_| anyhow!("Message key must be exactly 32 bytes"))?;

        Ok(Self::new(&key))
    }

    pub fn generate_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        key
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| anyhow!("Encryption failed: {e}"))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(payload))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let payload = BASE64
            .decode(encoded)
            .context("Encrypted payload is not valid base64")?;

        if payload.len() < NONCE_LEN {
            bail!("Encrypted payload is too short");
        }

        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| anyhow!("Decryption failed: {e}"))?;

        String::from_utf8(plaintext).context("Decrypted payload is not valid UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = MessageCipher::new(&MessageCipher::generate_key());

        let encrypted = cipher.encrypt("hello there").unwrap();
        assert_ne!(encrypted, "hello there");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "hello there");
    }

    #[test]
    fn same_plaintext_uses_fresh_nonce() {
        let cipher = MessageCipher::new(&MessageCipher::generate_key());

        let first = cipher.encrypt("again").unwrap();
        let second = cipher.encrypt("again").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn wrong_key_fails() {
        let cipher = MessageCipher::new(&MessageCipher::generate_key());
        let other = MessageCipher::new(&MessageCipher::generate_key());

        let encrypted = cipher.encrypt("secret").unwrap();
        assert!(other.decrypt(&encrypted).is_err());
    }

    #[test]
    fn key_must_be_32_bytes() {
        assert!(MessageCipher::from_base64(&BASE64.encode([7u8; 16])).is_err());
        assert!(MessageCipher::from_base64("not base64!").is_err());
        assert!(MessageCipher::from_base64(&BASE64.encode([7u8; 32])).is_ok());
    }
}
