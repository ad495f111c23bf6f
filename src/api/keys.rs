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

use serde::{Deserialize, Serialize};

use super::marshal::{call, take};
use crate::errors::Error;
use crate::ffi::bls::{
    bls_generate_blinded_g1_key, bls_generate_blinded_g2_key, bls_generate_g1_key, bls_generate_g2_key,
    bls_get_public_key, bls_public_key_g1_size, bls_public_key_g2_size, bls_public_key_to_bbs_key,
    bls_secret_key_to_bbs_key,
};
use crate::ffi::buffer::{ByteArray, ByteBuffer};

/// Offset of the message count in a serialized scheme key: `w` (G2) then `h0` (G1)
const MESSAGE_COUNT_OFFSET: usize = 96 + 48;

/// BLS key pair. The secret is missing for a public-only pair, the blinding factor is only
/// present for a blinded pair.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BlsKeyPair {
    pub public_key: Vec<u8>,
    pub secret_key: Option<Vec<u8>>,
    pub blinding_factor: Option<Vec<u8>>,
}

impl BlsKeyPair {
    fn generate(
        seed: Option<&[u8]>,
        f: extern "C" fn(ByteArray<'_>, &mut ByteBuffer, &mut ByteBuffer, &mut crate::ffi::error::ExternError) -> i32,
    ) -> Result<Self, Error> {
        let mut public_key = ByteBuffer::default();
        let mut secret_key = ByteBuffer::default();
        call(|err| f(ByteArray::from_option(seed), &mut public_key, &mut secret_key, err))?;
        Ok(Self {
            public_key: take(public_key),
            secret_key: Some(take(secret_key)),
            blinding_factor: None,
        })
    }

    fn generate_blinded(
        seed: Option<&[u8]>,
        f: extern "C" fn(
            ByteArray<'_>,
            &mut ByteBuffer,
            &mut ByteBuffer,
            &mut ByteBuffer,
            &mut crate::ffi::error::ExternError,
        ) -> i32,
    ) -> Result<Self, Error> {
        let mut public_key = ByteBuffer::default();
        let mut secret_key = ByteBuffer::default();
        let mut blinding_factor = ByteBuffer::default();
        call(|err| {
            f(
                ByteArray::from_option(seed),
                &mut public_key,
                &mut secret_key,
                &mut blinding_factor,
                err,
            )
        })?;
        Ok(Self {
            public_key: take(public_key),
            secret_key: Some(take(secret_key)),
            blinding_factor: Some(take(blinding_factor)),
        })
    }

    /// A missing seed draws fresh key material. The same seed always gives the same pair.
    pub fn generate_g1(seed: Option<&[u8]>) -> Result<Self, Error> {
        Self::generate(seed, bls_generate_g1_key)
    }

    pub fn generate_g2(seed: Option<&[u8]>) -> Result<Self, Error> {
        Self::generate(seed, bls_generate_g2_key)
    }

    pub fn generate_blinded_g1(seed: Option<&[u8]>) -> Result<Self, Error> {
        Self::generate_blinded(seed, bls_generate_blinded_g1_key)
    }

    pub fn generate_blinded_g2(seed: Option<&[u8]>) -> Result<Self, Error> {
        Self::generate_blinded(seed, bls_generate_blinded_g2_key)
    }

    /// Rebuilds the pair with its G2 public key
    pub fn from_secret_key(secret_key: Vec<u8>) -> Result<Self, Error> {
        let mut public_key = ByteBuffer::default();
        call(|err| bls_get_public_key(ByteArray::from(&secret_key), &mut public_key, err))?;
        Ok(Self {
            public_key: take(public_key),
            secret_key: Some(secret_key),
            blinding_factor: None,
        })
    }

    pub fn from_public_key(public_key: Vec<u8>) -> Self {
        Self {
            public_key,
            secret_key: None,
            blinding_factor: None,
        }
    }

    pub fn is_g1(&self) -> bool {
        self.public_key.len() == bls_public_key_g1_size() as usize
    }

    pub fn is_g2(&self) -> bool {
        self.public_key.len() == bls_public_key_g2_size() as usize
    }

    /// # Description
    /// Derives the scheme key for `message_count` messages, from the secret key when there is one
    /// and from the G2 public key otherwise.
    ///
    /// # Output:
    /// [`BbsKey`] or [`Error::G1KeyDerivation`] for a public-only G1 pair.
    pub fn bbs_key(&self, message_count: u32) -> Result<BbsKey, Error> {
        let mut public_key = ByteBuffer::default();
        match &self.secret_key {
            Some(sk) => call(|err| {
                bls_secret_key_to_bbs_key(ByteArray::from(sk), message_count, &mut public_key, err)
            })?,
            None if self.is_g2() => call(|err| {
                bls_public_key_to_bbs_key(
                    ByteArray::from(&self.public_key),
                    message_count,
                    &mut public_key,
                    err,
                )
            })?,
            None => return Err(Error::G1KeyDerivation),
        };
        Ok(BbsKey {
            public_key: take(public_key),
            message_count,
        })
    }
}

/// Public key extended for a fixed number of messages
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BbsKey {
    pub public_key: Vec<u8>,
    pub message_count: u32,
}

impl BbsKey {
    /// Reads the message count from the serialized key
    pub fn from_bytes(public_key: Vec<u8>) -> Result<Self, Error> {
        let count: [u8; 4] = public_key
            .get(MESSAGE_COUNT_OFFSET..MESSAGE_COUNT_OFFSET + 4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| Error::KeyDeserializationError("scheme key too short".to_owned()))?;
        Ok(Self {
            message_count: u32::from_be_bytes(count),
            public_key,
        })
    }
}
