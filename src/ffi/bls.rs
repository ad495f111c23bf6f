// Copyright 2023 Fondazione LINKS

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Key generation and scheme key derivation. None of these calls use a handle.

use std::panic::AssertUnwindSafe;

use ffi_support::call_with_result;
use log::debug;

use super::buffer::{ByteArray, ByteBuffer};
use super::error::{codes, status, ExternError, KeyDerivationError};
use super::Suite;
use crate::bbsplus::commitment::BlindFactor;
use crate::bbsplus::keys::{BBSplusG1PublicKey, BBSplusPublicKey, BBSplusSchemeKey, BBSplusSecretKey};
use crate::errors::Error;
use crate::keys::pair::KeyPair;
use crate::schemes::algorithms::BBSplus;

struct GeneratedKey {
    public_key: Vec<u8>,
    secret_key: Vec<u8>,
    blinding_factor: Option<Vec<u8>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Group {
    G1,
    G2,
}

/// An absent seed draws fresh key material, the same seed always gives the same key
fn generate(seed: ByteArray<'_>, group: Group, blinded: bool) -> Result<GeneratedKey, Error> {
    let (sk, pk) = KeyPair::<BBSplus<Suite>>::from_seed(seed.as_opt_slice())?.into_parts();
    let (public_key, blinding_factor) = match (group, blinded) {
        (Group::G1, false) => (sk.g1_public_key().to_bytes().to_vec(), None),
        (Group::G2, false) => (pk.to_bytes().to_vec(), None),
        (Group::G1, true) => {
            let (blinded_pk, r) = sk.g1_public_key().blind::<Suite>();
            (blinded_pk.to_bytes().to_vec(), Some(r.to_bytes().to_vec()))
        }
        (Group::G2, true) => {
            let (blinded_pk, r) = pk.blind::<Suite>();
            (blinded_pk.to_bytes().to_vec(), Some(r.to_bytes().to_vec()))
        }
    };
    Ok(GeneratedKey {
        public_key,
        secret_key: sk.to_bytes().to_vec(),
        blinding_factor,
    })
}

fn write_key(
    key: GeneratedKey,
    public_key: &mut ByteBuffer,
    secret_key: &mut ByteBuffer,
    blinding_factor: Option<&mut ByteBuffer>,
) {
    *public_key = ByteBuffer::from_vec(key.public_key);
    *secret_key = ByteBuffer::from_vec(key.secret_key);
    if let (Some(out), Some(bf)) = (blinding_factor, key.blinding_factor) {
        *out = ByteBuffer::from_vec(bf);
    }
}

fn generate_into(
    seed: ByteArray<'_>,
    group: Group,
    public_key: &mut ByteBuffer,
    secret_key: &mut ByteBuffer,
    blinding_factor: Option<&mut ByteBuffer>,
    err: &mut ExternError,
) -> i32 {
    let blinded = blinding_factor.is_some();
    let mut key = None;
    call_with_result(
        err,
        AssertUnwindSafe(|| -> Result<(), Error> {
            key = Some(generate(seed, group, blinded)?);
            Ok(())
        }),
    );
    if let Some(key) = key {
        debug!("generated a {} key", if group == Group::G1 { "G1" } else { "G2" });
        write_key(key, public_key, secret_key, blinding_factor);
    }
    status(err)
}

fn to_scheme_key(w: &BBSplusPublicKey, message_count: u32) -> Result<ByteBuffer, ExternError> {
    BBSplusSchemeKey::from_public_key::<Suite>(w, message_count as usize)
        .map(|pk| ByteBuffer::from_vec(pk.to_bytes()))
        .map_err(|e| KeyDerivationError(e).into())
}

#[no_mangle]
pub extern "C" fn bls_secret_key_size() -> i32 {
    BBSplusSecretKey::LENGTH as i32
}

#[no_mangle]
pub extern "C" fn bls_public_key_g1_size() -> i32 {
    BBSplusG1PublicKey::LENGTH as i32
}

#[no_mangle]
pub extern "C" fn bls_public_key_g2_size() -> i32 {
    BBSplusPublicKey::LENGTH as i32
}

#[no_mangle]
pub extern "C" fn blinding_factor_size() -> i32 {
    BlindFactor::LENGTH as i32
}

#[no_mangle]
pub extern "C" fn bls_generate_g1_key(
    seed: ByteArray<'_>,
    public_key: &mut ByteBuffer,
    secret_key: &mut ByteBuffer,
    err: &mut ExternError,
) -> i32 {
    generate_into(seed, Group::G1, public_key, secret_key, None, err)
}

#[no_mangle]
pub extern "C" fn bls_generate_g2_key(
    seed: ByteArray<'_>,
    public_key: &mut ByteBuffer,
    secret_key: &mut ByteBuffer,
    err: &mut ExternError,
) -> i32 {
    generate_into(seed, Group::G2, public_key, secret_key, None, err)
}

#[no_mangle]
pub extern "C" fn bls_generate_blinded_g1_key(
    seed: ByteArray<'_>,
    public_key: &mut ByteBuffer,
    secret_key: &mut ByteBuffer,
    blinding_factor: &mut ByteBuffer,
    err: &mut ExternError,
) -> i32 {
    generate_into(seed, Group::G1, public_key, secret_key, Some(blinding_factor), err)
}

#[no_mangle]
pub extern "C" fn bls_generate_blinded_g2_key(
    seed: ByteArray<'_>,
    public_key: &mut ByteBuffer,
    secret_key: &mut ByteBuffer,
    blinding_factor: &mut ByteBuffer,
    err: &mut ExternError,
) -> i32 {
    generate_into(seed, Group::G2, public_key, secret_key, Some(blinding_factor), err)
}

#[no_mangle]
pub extern "C" fn bls_get_public_key(
    secret_key: ByteArray<'_>,
    public_key: &mut ByteBuffer,
    err: &mut ExternError,
) -> i32 {
    let bytes = call_with_result(err, || -> Result<ByteBuffer, Error> {
        let sk = BBSplusSecretKey::from_bytes(secret_key.required("Secret Key")?)?;
        Ok(ByteBuffer::from_vec(sk.public_key().to_bytes().to_vec()))
    });
    if status(err) == codes::SUCCESS {
        *public_key = bytes;
    }
    status(err)
}

/// Fails with code 2 when the key cannot be extended to `message_count` messages
#[no_mangle]
pub extern "C" fn bls_secret_key_to_bbs_key(
    secret_key: ByteArray<'_>,
    message_count: u32,
    public_key: &mut ByteBuffer,
    err: &mut ExternError,
) -> i32 {
    let bytes = call_with_result(err, || -> Result<ByteBuffer, ExternError> {
        let sk = BBSplusSecretKey::from_bytes(secret_key.required("Secret Key")?)?;
        to_scheme_key(&sk.public_key(), message_count)
    });
    if status(err) == codes::SUCCESS {
        *public_key = bytes;
    }
    status(err)
}

/// Only G2 public keys can be extended into a scheme key
#[no_mangle]
pub extern "C" fn bls_public_key_to_bbs_key(
    d_public_key: ByteArray<'_>,
    message_count: u32,
    public_key: &mut ByteBuffer,
    err: &mut ExternError,
) -> i32 {
    let bytes = call_with_result(err, || -> Result<ByteBuffer, ExternError> {
        let raw = d_public_key.required("Public Key")?;
        let w = BBSplusPublicKey::from_bytes(raw).map_err(|e| {
            Error::KeyDeserializationError(format!("{}, found length {}", e, raw.len()))
        })?;
        to_scheme_key(&w, message_count)
    });
    if status(err) == codes::SUCCESS {
        *public_key = bytes;
    }
    status(err)
}
