//! User-data decryption and encryption using AES-128-CBC.
//!
//! The unpacked save archive stores each user-data file as a random
//! 16-byte IV followed by the AES-128-CBC ciphertext. These functions only
//! transform byte buffers; file handling is the caller's job, and a
//! decrypted buffer should never outlive a single load-edit-save cycle.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{
    block_padding::{NoPadding, Pkcs7},
    BlockDecryptMut, BlockEncryptMut, KeyIvInit,
};
use rand::RngCore;

use crate::{Error, Result};

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

/// The AES-128 key used for save-slot user data.
///
/// This is hardcoded in the game client and is not a secret.
const SAVE_AES_KEY: [u8; 16] = [
    0xB1, 0x56, 0x87, 0x9F, 0x13, 0x48, 0x97, 0x98, 0x70, 0x05, 0xC4, 0x87, 0x00, 0xAE, 0xF8, 0x79,
];

/// AES block size in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Decrypt an encrypted user-data buffer.
///
/// The input is `iv || ciphertext`. No unpadding is performed; the
/// container decoder reads its declared inner size and ignores whatever
/// padding follows.
pub fn decrypt(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < AES_BLOCK_SIZE {
        return Err(Error::Decryption(format!(
            "buffer too short for an IV: {} bytes",
            data.len()
        )));
    }

    let (iv, ciphertext) = data.split_at(AES_BLOCK_SIZE);
    if ciphertext.is_empty() || ciphertext.len() % AES_BLOCK_SIZE != 0 {
        return Err(Error::Decryption(format!(
            "ciphertext length {} is not a positive multiple of {AES_BLOCK_SIZE}",
            ciphertext.len()
        )));
    }

    let key = GenericArray::from_slice(&SAVE_AES_KEY);
    let iv = GenericArray::from_slice(iv);
    let decryptor = Aes128CbcDec::new(key, iv);

    let mut buffer = ciphertext.to_vec();
    decryptor
        .decrypt_padded_mut::<NoPadding>(&mut buffer)
        .map_err(|_| Error::Decryption("block decryption failed".to_string()))?;

    Ok(buffer)
}

/// Encrypt a plaintext user-data buffer.
///
/// A fresh random IV is generated per call and prefixed to the PKCS#7
/// padded ciphertext.
pub fn encrypt(plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut iv = [0u8; AES_BLOCK_SIZE];
    rand::thread_rng().fill_bytes(&mut iv);
    encrypt_with_iv(plaintext, &iv)
}

/// Encrypt with a caller-provided IV. Exposed for deterministic tests.
pub fn encrypt_with_iv(plaintext: &[u8], iv: &[u8; AES_BLOCK_SIZE]) -> Result<Vec<u8>> {
    let key = GenericArray::from_slice(&SAVE_AES_KEY);
    let encryptor = Aes128CbcEnc::new(key, GenericArray::from_slice(iv));

    let mut buffer = vec![0u8; plaintext.len() + AES_BLOCK_SIZE];
    buffer[..plaintext.len()].copy_from_slice(plaintext);
    let ciphertext_len = encryptor
        .encrypt_padded_mut::<Pkcs7>(&mut buffer, plaintext.len())
        .map_err(|_| Error::Encryption("block encryption failed".to_string()))?
        .len();
    buffer.truncate(ciphertext_len);

    let mut out = Vec::with_capacity(AES_BLOCK_SIZE + buffer.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(&buffer);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let plaintext = vec![0x42u8; 100];
        let encrypted = encrypt(&plaintext).unwrap();
        assert_eq!(encrypted.len(), AES_BLOCK_SIZE + 112); // IV + padded blocks

        let decrypted = decrypt(&encrypted).unwrap();
        assert_eq!(&decrypted[..plaintext.len()], &plaintext[..]);
        // PKCS#7 pad of a 100-byte message fills 12 bytes of 0x0C.
        assert!(decrypted[plaintext.len()..].iter().all(|&b| b == 0x0C));
    }

    #[test]
    fn test_block_aligned_plaintext_gains_full_pad_block() {
        let plaintext = vec![0u8; 32];
        let encrypted = encrypt_with_iv(&plaintext, &[7u8; 16]).unwrap();
        assert_eq!(encrypted.len(), AES_BLOCK_SIZE + 32 + AES_BLOCK_SIZE);
    }

    #[test]
    fn test_iv_affects_ciphertext() {
        let plaintext = vec![0x11u8; 48];
        let a = encrypt_with_iv(&plaintext, &[0u8; 16]).unwrap();
        let b = encrypt_with_iv(&plaintext, &[1u8; 16]).unwrap();
        assert_ne!(a[16..], b[16..]);
    }

    #[test]
    fn test_short_buffer_rejected() {
        assert!(matches!(decrypt(&[0u8; 10]), Err(Error::Decryption(_))));
        assert!(matches!(decrypt(&[0u8; 20]), Err(Error::Decryption(_))));
    }
}
