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

use bls12_381_plus::{G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
use elliptic_curve::group::Curve;
use ff::Field;
use elliptic_curve::hash2curve::{ExpandMsg, Expander};
use rand::RngCore;

use crate::bbsplus::ciphersuites::BbsCiphersuite;
use crate::errors::Error;

pub const SCALAR_LEN: usize = 32;
pub const G1_LEN: usize = 48;
pub const G2_LEN: usize = 96;

/// Integer to Octet Stream, big endian, truncated to `len` bytes
pub fn i2osp(x: usize, len: usize) -> Vec<u8> {
    let bytes = (x as u64).to_be_bytes();
    if len >= bytes.len() {
        let mut out = vec![0u8; len - bytes.len()];
        out.extend_from_slice(&bytes);
        out
    } else {
        bytes[bytes.len() - len..].to_vec()
    }
}

/// # Description
/// Hashes an arbitrary octet string to a non-zero scalar.
/// A one byte counter is appended to the input and increased until the output is non-zero.
///
/// # Inputs:
/// * `msg_octects`, the octet string to hash
/// * `dst`, the domain separation tag
pub fn hash_to_scalar<CS: BbsCiphersuite>(msg_octects: &[u8], dst: &[u8]) -> Result<Scalar, Error>
where
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    let mut counter: u8 = 0;
    let mut hashed_scalar = Scalar::ZERO;
    let mut uniform_bytes = [0u8; 48];

    while hashed_scalar == Scalar::ZERO {
        let msg_prime = [msg_octects, &[counter; 1][..]].concat();
        CS::Expander::expand_message(&[msg_prime.as_slice()], &[dst], CS::EXPAND_LEN)
            .map_err(|_| Error::HashToScalarError)?
            .fill_bytes(&mut uniform_bytes);
        hashed_scalar = Scalar::from_okm(&uniform_bytes);

        counter = counter.checked_add(1).ok_or(Error::HashToScalarError)?;
    }

    Ok(hashed_scalar)
}

/// Fresh random scalars, each sampled from 48 uniform bytes
pub fn calculate_random_scalars(count: usize) -> Vec<Scalar> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let mut buf = [0u8; 48];
            rng.fill_bytes(&mut buf);
            Scalar::from_okm(&buf)
        })
        .collect()
}

pub trait ScalarExt: Sized {
    fn to_bytes_be(&self) -> [u8; SCALAR_LEN];
    fn from_bytes_be(bytes: &[u8]) -> Result<Self, Error>;
}

impl ScalarExt for Scalar {
    fn to_bytes_be(&self) -> [u8; SCALAR_LEN] {
        self.to_be_bytes()
    }

    fn from_bytes_be(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; SCALAR_LEN] = bytes
            .try_into()
            .map_err(|_| Error::DeserializationError(format!("scalar must be {} bytes", SCALAR_LEN)))?;
        Option::from(Scalar::from_be_bytes(&bytes))
            .ok_or_else(|| Error::DeserializationError("scalar is not canonical".to_owned()))
    }
}

pub fn g1_to_bytes(p: &G1Projective) -> [u8; G1_LEN] {
    p.to_affine().to_compressed()
}

pub fn g1_from_bytes(bytes: &[u8]) -> Result<G1Projective, Error> {
    let bytes: [u8; G1_LEN] = bytes
        .try_into()
        .map_err(|_| Error::DeserializationError(format!("G1 point must be {} bytes", G1_LEN)))?;
    Option::from(G1Affine::from_compressed(&bytes).map(G1Projective::from))
        .ok_or_else(|| Error::DeserializationError("invalid G1 point".to_owned()))
}

pub fn g2_to_bytes(p: &G2Projective) -> [u8; G2_LEN] {
    p.to_affine().to_compressed()
}

pub fn g2_from_bytes(bytes: &[u8]) -> Result<G2Projective, Error> {
    let bytes: [u8; G2_LEN] = bytes
        .try_into()
        .map_err(|_| Error::DeserializationError(format!("G2 point must be {} bytes", G2_LEN)))?;
    Option::from(G2Affine::from_compressed(&bytes).map(G2Projective::from))
        .ok_or_else(|| Error::DeserializationError("invalid G2 point".to_owned()))
}

/// Splits `bytes` into consecutive scalars
pub fn scalars_from_bytes(bytes: &[u8]) -> Result<Vec<Scalar>, Error> {
    if bytes.len() % SCALAR_LEN != 0 {
        return Err(Error::DeserializationError(
            "trailing bytes after the last scalar".to_owned(),
        ));
    }
    bytes.chunks(SCALAR_LEN).map(Scalar::from_bytes_be).collect()
}

pub fn get_remaining_indexes(length: usize, indexes: &[usize]) -> Vec<usize> {
    (0..length).filter(|i| !indexes.contains(i)).collect()
}

/// Sequential reader over a serialized object
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| Error::DeserializationError("input too short".to_owned()))?;
        let out = &self.data[self.offset..end];
        self.offset = end;
        Ok(out)
    }

    pub(crate) fn g1(&mut self) -> Result<G1Projective, Error> {
        g1_from_bytes(self.take(G1_LEN)?)
    }

    pub(crate) fn scalar(&mut self) -> Result<Scalar, Error> {
        Scalar::from_bytes_be(self.take(SCALAR_LEN)?)
    }

    pub(crate) fn rest(&mut self) -> &'a [u8] {
        let out = &self.data[self.offset..];
        self.offset = self.data.len();
        out
    }
}
