// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sealed-box encoding of secret values.
//!
//! GitHub only accepts secret values encrypted to the environment's current
//! public key with an anonymous sealed box (libsodium `crypto_box_seal`:
//! X25519 + XSalsa20-Poly1305 with an ephemeral sender key). The output is
//! base64 ciphertext paired with the `key_id` of the key it was sealed to.
//!
//! Ciphertexts differ on every call for the same input because of the
//! ephemeral key. Only the holder of the private key can check them.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use crypto_box::{aead::OsRng, PublicKey};
use serde::Serialize;

use crate::models::EnvironmentPublicKey;

const PUBLIC_KEY_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum SealError {
    #[error("public key {key_id} is not valid base64: {source}")]
    KeyEncoding {
        key_id: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("public key {key_id} has {len} bytes, expected 32")]
    KeyLength { key_id: String, len: usize },

    #[error("sealed-box encryption failed")]
    Encryption,
}

/// Ciphertext ready for the secret-write endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SealedSecret {
    pub encrypted_value: String,
    pub key_id: String,
}

/// Seal `plaintext` to the given environment public key.
pub fn seal(plaintext: &str, public_key: &EnvironmentPublicKey) -> Result<SealedSecret, SealError> {
    let recipient = decode_public_key(public_key)?;
    let ciphertext = recipient
        .seal(&mut OsRng, plaintext.as_bytes())
        .map_err(|_| SealError::Encryption)?;

    Ok(SealedSecret {
        encrypted_value: STANDARD.encode(ciphertext),
        key_id: public_key.key_id.clone(),
    })
}

fn decode_public_key(public_key: &EnvironmentPublicKey) -> Result<PublicKey, SealError> {
    let bytes = STANDARD
        .decode(public_key.key.trim())
        .map_err(|source| SealError::KeyEncoding {
            key_id: public_key.key_id.clone(),
            source,
        })?;

    let raw: [u8; PUBLIC_KEY_LEN] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| SealError::KeyLength {
            key_id: public_key.key_id.clone(),
            len: bytes.len(),
        })?;

    Ok(PublicKey::from(raw))
}
