//! AES-CBC with PKCS#5/PKCS#7 padding, fed incrementally
//!
//! A [`CipherHandle`] is created already initialised for one direction and
//! is consumed by [`CipherHandle::finish`], so it cannot be updated after it
//! has been finalised.
//!
//! No integrity tag is produced or checked. A flipped ciphertext bit is
//! only noticed if it happens to break the padding.

use aes::{Aes128, Aes192, Aes256, Block};
use cbc::cipher::block_padding::{Padding, Pkcs7};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, InvalidLength, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use super::{KeyAlgorithm, KeyMaterial};
use crate::config::{Config, SUPPORTED_CIPHER_INSTANCE};
use crate::error::{CryptError, Result};

/// AES block size, which is also the IV length
pub const BLOCK_LEN: usize = 16;

/// IV length in bytes
pub const IV_LEN: usize = BLOCK_LEN;

/// Generate a fresh random IV
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Builds cipher handles for the configured transform
#[derive(Debug, Clone)]
pub struct CipherPipeline {
    transform: String,
}

impl CipherPipeline {
    /// Pipeline for the profile's cipher transformation
    pub fn new(config: &Config) -> Self {
        Self {
            transform: config.cipher_transform().to_string(),
        }
    }

    /// Start an encryption with `key` and a 16-byte `iv`
    pub fn init_encrypt(&self, key: &KeyMaterial, iv: &[u8]) -> Result<CipherHandle> {
        self.init(key, iv, Direction::Encrypt)
    }

    /// Start a decryption with `key` and the `iv` read from the payload
    pub fn init_decrypt(&self, key: &KeyMaterial, iv: &[u8]) -> Result<CipherHandle> {
        self.init(key, iv, Direction::Decrypt)
    }

    fn init(&self, key: &KeyMaterial, iv: &[u8], direction: Direction) -> Result<CipherHandle> {
        if self.transform != SUPPORTED_CIPHER_INSTANCE {
            return Err(CryptError::CipherInit(format!(
                "unsupported transform '{}'",
                self.transform
            )));
        }

        if key.algorithm() != KeyAlgorithm::Aes {
            return Err(CryptError::CipherInit("key is not an AES key".into()));
        }

        if iv.len() != IV_LEN {
            return Err(CryptError::CipherInit(format!(
                "invalid IV length: expected {}, got {}",
                IV_LEN,
                iv.len()
            )));
        }

        let engine = Engine::new(key.as_bytes(), iv, direction)?;

        Ok(CipherHandle {
            engine,
            pending: Vec::with_capacity(BLOCK_LEN),
            held: None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

enum Engine {
    Enc128(cbc::Encryptor<Aes128>),
    Enc192(cbc::Encryptor<Aes192>),
    Enc256(cbc::Encryptor<Aes256>),
    Dec128(cbc::Decryptor<Aes128>),
    Dec192(cbc::Decryptor<Aes192>),
    Dec256(cbc::Decryptor<Aes256>),
}

impl Engine {
    fn new(key: &[u8], iv: &[u8], direction: Direction) -> Result<Self> {
        let bad_key = |_: InvalidLength| {
            CryptError::CipherInit(format!("invalid AES key length: {} bytes", key.len()))
        };

        let engine = match (direction, key.len()) {
            (Direction::Encrypt, 16) => {
                Engine::Enc128(cbc::Encryptor::new_from_slices(key, iv).map_err(bad_key)?)
            }
            (Direction::Encrypt, 24) => {
                Engine::Enc192(cbc::Encryptor::new_from_slices(key, iv).map_err(bad_key)?)
            }
            (Direction::Encrypt, 32) => {
                Engine::Enc256(cbc::Encryptor::new_from_slices(key, iv).map_err(bad_key)?)
            }
            (Direction::Decrypt, 16) => {
                Engine::Dec128(cbc::Decryptor::new_from_slices(key, iv).map_err(bad_key)?)
            }
            (Direction::Decrypt, 24) => {
                Engine::Dec192(cbc::Decryptor::new_from_slices(key, iv).map_err(bad_key)?)
            }
            (Direction::Decrypt, 32) => {
                Engine::Dec256(cbc::Decryptor::new_from_slices(key, iv).map_err(bad_key)?)
            }
            (_, n) => {
                return Err(CryptError::CipherInit(format!(
                    "invalid AES key length: {} bytes",
                    n
                )))
            }
        };

        Ok(engine)
    }

    fn direction(&self) -> Direction {
        match self {
            Engine::Enc128(_) | Engine::Enc192(_) | Engine::Enc256(_) => Direction::Encrypt,
            Engine::Dec128(_) | Engine::Dec192(_) | Engine::Dec256(_) => Direction::Decrypt,
        }
    }

    fn process(&mut self, block: &mut Block) {
        match self {
            Engine::Enc128(c) => c.encrypt_block_mut(block),
            Engine::Enc192(c) => c.encrypt_block_mut(block),
            Engine::Enc256(c) => c.encrypt_block_mut(block),
            Engine::Dec128(c) => c.decrypt_block_mut(block),
            Engine::Dec192(c) => c.decrypt_block_mut(block),
            Engine::Dec256(c) => c.decrypt_block_mut(block),
        }
    }
}

/// One initialised encryption or decryption in progress
pub struct CipherHandle {
    engine: Engine,
    /// Input bytes not yet forming a whole block
    pending: Vec<u8>,
    /// Last decrypted block, kept back until we know whether it carries padding
    held: Option<Block>,
}

impl CipherHandle {
    /// Feed more input; returns whatever output is ready
    pub fn update(&mut self, input: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(input.len() + BLOCK_LEN);
        let mut input = input;

        if !self.pending.is_empty() {
            let take = (BLOCK_LEN - self.pending.len()).min(input.len());
            self.pending.extend_from_slice(&input[..take]);
            input = &input[take..];

            if self.pending.len() < BLOCK_LEN {
                return out;
            }

            let mut block = Block::clone_from_slice(&self.pending);
            self.pending.zeroize();
            self.push_block(&mut block, &mut out);
        }

        let mut chunks = input.chunks_exact(BLOCK_LEN);
        for chunk in &mut chunks {
            let mut block = Block::clone_from_slice(chunk);
            self.push_block(&mut block, &mut out);
        }
        self.pending.extend_from_slice(chunks.remainder());

        out
    }

    /// Apply or strip padding and emit the final bytes
    pub fn finish(mut self) -> Result<Vec<u8>> {
        match self.engine.direction() {
            Direction::Encrypt => {
                let pos = self.pending.len();
                let mut block = Block::default();
                block[..pos].copy_from_slice(&self.pending);
                Pkcs7::pad(&mut block, pos);
                self.engine.process(&mut block);
                Ok(block.to_vec())
            }
            Direction::Decrypt => {
                if !self.pending.is_empty() {
                    return Err(CryptError::CipherOperation);
                }
                let block = self.held.take().ok_or(CryptError::CipherOperation)?;
                let plain = Pkcs7::unpad(&block)
                    .map_err(|_| CryptError::CipherOperation)?
                    .to_vec();
                Ok(plain)
            }
        }
    }

    fn push_block(&mut self, block: &mut Block, out: &mut Vec<u8>) {
        self.engine.process(block);

        match self.engine.direction() {
            Direction::Encrypt => out.extend_from_slice(block),
            Direction::Decrypt => {
                if let Some(previous) = self.held.replace(*block) {
                    out.extend_from_slice(&previous);
                }
            }
        }
    }
}

impl Drop for CipherHandle {
    fn drop(&mut self) {
        self.pending.zeroize();
        if let Some(block) = self.held.as_mut() {
            block.as_mut_slice().zeroize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SecureBytes;

    fn pipeline() -> CipherPipeline {
        CipherPipeline {
            transform: SUPPORTED_CIPHER_INSTANCE.to_string(),
        }
    }

    fn key(len: usize, fill: u8) -> KeyMaterial {
        KeyMaterial::new(SecureBytes::new(vec![fill; len]), KeyAlgorithm::Aes)
    }

    fn encrypt_all(key: &KeyMaterial, iv: &[u8], data: &[u8], step: usize) -> Vec<u8> {
        let mut handle = pipeline().init_encrypt(key, iv).unwrap();
        let mut out = Vec::new();
        for chunk in data.chunks(step.max(1)) {
            out.extend(handle.update(chunk));
        }
        out.extend(handle.finish().unwrap());
        out
    }

    fn decrypt_all(key: &KeyMaterial, iv: &[u8], data: &[u8], step: usize) -> Result<Vec<u8>> {
        let mut handle = pipeline().init_decrypt(key, iv)?;
        let mut out = Vec::new();
        for chunk in data.chunks(step.max(1)) {
            out.extend(handle.update(chunk));
        }
        out.extend(handle.finish()?);
        Ok(out)
    }

    #[test]
    fn test_nist_cbc_aes128_first_block() {
        // NIST SP 800-38A F.2.1, followed by one full block of padding
        let key = KeyMaterial::new(
            SecureBytes::new(hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap()),
            KeyAlgorithm::Aes,
        );
        let iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let plain = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();

        let cipher = encrypt_all(&key, &iv, &plain, 16);

        assert_eq!(cipher.len(), 32);
        assert_eq!(hex::encode(&cipher[..16]), "7649abac8119b246cee98e9b12e9197d");
        assert_eq!(decrypt_all(&key, &iv, &cipher, 16).unwrap(), plain);
    }

    #[test]
    fn test_roundtrip_all_key_sizes_and_chunkings() {
        let iv = [7u8; IV_LEN];
        let data: Vec<u8> = (0..=200u8).collect();

        for len in [16, 24, 32] {
            let k = key(len, 0x42);
            for step in [1, 5, 16, 17, 64, 500] {
                let cipher = encrypt_all(&k, &iv, &data, step);
                assert_eq!(cipher.len() % BLOCK_LEN, 0);
                assert_eq!(decrypt_all(&k, &iv, &cipher, step).unwrap(), data);
            }
        }
    }

    #[test]
    fn test_empty_input_is_one_padding_block() {
        let k = key(32, 1);
        let iv = [0u8; IV_LEN];

        let cipher = encrypt_all(&k, &iv, b"", 16);

        assert_eq!(cipher.len(), BLOCK_LEN);
        assert!(decrypt_all(&k, &iv, &cipher, 16).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_key_fails_or_differs() {
        let iv = generate_iv();
        let plain = b"Secret message that spans more than one block";
        let cipher = encrypt_all(&key(32, 1), &iv, plain, 16);

        match decrypt_all(&key(32, 2), &iv, &cipher, 16) {
            Err(CryptError::CipherOperation) => {}
            Ok(out) => assert_ne!(out, plain.to_vec()),
            Err(e) => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let k = key(32, 1);
        let iv = [0u8; IV_LEN];
        let cipher = encrypt_all(&k, &iv, b"0123456789abcdef0123", 16);

        let result = decrypt_all(&k, &iv, &cipher[..cipher.len() - 1], 16);
        assert!(matches!(result, Err(CryptError::CipherOperation)));
    }

    #[test]
    fn test_empty_ciphertext_fails() {
        let result = decrypt_all(&key(32, 1), &[0u8; IV_LEN], b"", 16);
        assert!(matches!(result, Err(CryptError::CipherOperation)));
    }

    #[test]
    fn test_bad_iv_length() {
        let result = pipeline().init_encrypt(&key(32, 1), &[0u8; 8]);
        assert!(matches!(result, Err(CryptError::CipherInit(_))));
    }

    #[test]
    fn test_unsupported_transform() {
        let p = CipherPipeline {
            transform: "AES/ECB/NoPadding".into(),
        };
        assert!(matches!(
            p.init_encrypt(&key(32, 1), &[0u8; IV_LEN]),
            Err(CryptError::CipherInit(_))
        ));
    }

    #[test]
    fn test_generated_ivs_differ() {
        assert_ne!(generate_iv(), generate_iv());
    }
}
