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

use bls12_381_plus::{G1Projective, G2Projective, Scalar};
use elliptic_curve::hash2curve::ExpandMsg;
use ff::Field;
use serde::{Deserialize, Serialize};

use super::ciphersuites::BbsCiphersuite;
use super::commitment::BlindFactor;
use super::generators::Generators;
use crate::errors::Error;
use crate::keys::traits::{PrivateKey, PublicKey};
use crate::utils::util::{
    g1_from_bytes, g1_to_bytes, g2_from_bytes, g2_to_bytes,
    hash_to_scalar, i2osp, ByteReader, ScalarExt, G1_LEN, G2_LEN, SCALAR_LEN,
};

/// Deterministic public key `w = x * P2`
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BBSplusPublicKey(pub G2Projective);

impl BBSplusPublicKey {
    pub const LENGTH: usize = G2_LEN;

    pub fn to_bytes(&self) -> [u8; G2_LEN] {
        g2_to_bytes(&self.0)
    }

    pub fn encode(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        g2_from_bytes(bytes)
            .map(Self)
            .map_err(|e| Error::KeyDeserializationError(e.to_string()))
    }

    /// Adds `r * H2` to the key and returns `r`
    pub fn blind<CS>(&self) -> (Self, BlindFactor)
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let r = BlindFactor::random();
        let h = G2Projective::hash::<CS::Expander>(CS::BLINDING_G2_DST, CS::BLINDING_G2_DST);
        (Self(self.0 + h * r.0), r)
    }
}

impl PublicKey for BBSplusPublicKey {
    type Output = [u8; G2_LEN];

    fn to_bytes(&self) -> Self::Output {
        self.to_bytes()
    }
}

/// Short public key `x * P1`. It cannot be turned into a [`BBSplusSchemeKey`]
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BBSplusG1PublicKey(pub G1Projective);

impl BBSplusG1PublicKey {
    pub const LENGTH: usize = G1_LEN;

    pub fn to_bytes(&self) -> [u8; G1_LEN] {
        g1_to_bytes(&self.0)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        g1_from_bytes(bytes)
            .map(Self)
            .map_err(|e| Error::KeyDeserializationError(e.to_string()))
    }

    pub fn blind<CS>(&self) -> (Self, BlindFactor)
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let r = BlindFactor::random();
        let h = G1Projective::hash::<CS::Expander>(CS::BLINDING_G1_DST, CS::BLINDING_G1_DST);
        (Self(self.0 + h * r.0), r)
    }
}

impl PublicKey for BBSplusG1PublicKey {
    type Output = [u8; G1_LEN];

    fn to_bytes(&self) -> Self::Output {
        self.to_bytes()
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BBSplusSecretKey(pub Scalar);

impl BBSplusSecretKey {
    pub const LENGTH: usize = SCALAR_LEN;

    //in BE order
    pub fn to_bytes(&self) -> [u8; SCALAR_LEN] {
        self.0.to_bytes_be()
    }

    pub fn encode(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let s = Scalar::from_bytes_be(bytes)
            .map_err(|e| Error::KeyDeserializationError(e.to_string()))?;
        if s == Scalar::ZERO {
            return Err(Error::KeyDeserializationError("secret key is zero".to_owned()));
        }
        Ok(Self(s))
    }

    pub fn public_key(&self) -> BBSplusPublicKey {
        BBSplusPublicKey(sk_to_pk(self.0))
    }

    pub fn g1_public_key(&self) -> BBSplusG1PublicKey {
        BBSplusG1PublicKey(G1Projective::GENERATOR * self.0)
    }
}

impl PrivateKey for BBSplusSecretKey {
    type Output = [u8; SCALAR_LEN];

    fn to_bytes(&self) -> Self::Output {
        self.to_bytes()
    }
}

/// Public key extended with the generators for a fixed number of messages.
///
/// Serialized as `w || h0 || I2OSP(L, 4) || h_1 || ... || h_L`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BBSplusSchemeKey {
    pub w: BBSplusPublicKey,
    pub generators: Generators,
}

impl BBSplusSchemeKey {
    pub fn from_public_key<CS>(pk: &BBSplusPublicKey, message_count: usize) -> Result<Self, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        if message_count == 0 {
            return Err(Error::InvalidMessageCount);
        }
        let generators = Generators::create::<CS>(&pk.to_bytes(), message_count)?;
        Ok(Self {
            w: pk.clone(),
            generators,
        })
    }

    pub fn from_secret_key<CS>(sk: &BBSplusSecretKey, message_count: usize) -> Result<Self, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        Self::from_public_key::<CS>(&sk.public_key(), message_count)
    }

    pub fn message_count(&self) -> usize {
        self.generators.message_generators.len()
    }

    pub fn h0(&self) -> G1Projective {
        self.generators.q1
    }

    pub fn h(&self) -> &[G1Projective] {
        &self.generators.message_generators
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let L = self.message_count();
        let mut bytes = Vec::with_capacity(G2_LEN + G1_LEN * (L + 1) + 4);
        bytes.extend_from_slice(&self.w.to_bytes());
        bytes.extend_from_slice(&g1_to_bytes(&self.h0()));
        bytes.extend_from_slice(&i2osp(L, 4));
        self.h()
            .iter()
            .for_each(|p| bytes.extend_from_slice(&g1_to_bytes(p)));
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let invalid = |e: Error| Error::KeyDeserializationError(e.to_string());
        let mut reader = ByteReader::new(bytes);
        let w = BBSplusPublicKey::from_bytes(reader.take(G2_LEN).map_err(invalid)?)?;
        let h0 = reader.g1().map_err(invalid)?;
        let len_bytes: [u8; 4] = reader
            .take(4)
            .map_err(invalid)?
            .try_into()
            .map_err(|_| Error::KeyDeserializationError("message count".to_owned()))?;
        let L = u32::from_be_bytes(len_bytes) as usize;
        if L == 0 {
            return Err(Error::InvalidMessageCount);
        }
        let rest = reader.rest();
        if rest.len() != L * G1_LEN {
            return Err(Error::KeyDeserializationError(format!(
                "expected {} message generators",
                L
            )));
        }
        let message_generators = rest
            .chunks(G1_LEN)
            .map(g1_from_bytes)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        Ok(Self {
            w,
            generators: Generators {
                g1_base_point: G1Projective::GENERATOR,
                q1: h0,
                message_generators,
            },
        })
    }
}

/// # Description
/// This operation generates a secret key (SK) deterministically from a secret octet string (key_material)
///
/// # Inputs:
/// * `key_material` (REQUIRED), a secret octet string of at least 32 bytes.
/// * `key_info` (OPTIONAL), an octet string. Defaults to an empty string if not supplied.
/// * `key_dst` (OPTIONAL), an octet string representing the domain separation tag.
///   Defaults to ciphersuite_id || "KEYGEN_DST_" if not supplied.
///
pub(crate) fn key_gen<CS>(
    key_material: &[u8],
    key_info: Option<&[u8]>,
    key_dst: Option<&[u8]>,
) -> Result<Scalar, Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    if key_material.len() < CS::IKM_LEN {
        return Err(Error::KeyGenError("length(key_material) < 32".to_owned()));
    }

    let key_info = key_info.unwrap_or(&[]);

    if key_info.len() > 65535 {
        return Err(Error::KeyGenError("length(key_info) > 65535".to_owned()));
    }

    let key_dst_default = CS::keygen_dst();
    let key_dst = key_dst.unwrap_or(&key_dst_default);

    // derive_input = key_material || I2OSP(length(key_info), 2) || key_info
    let derive_input = [key_material, &i2osp(key_info.len(), 2), key_info].concat();

    hash_to_scalar::<CS>(&derive_input, key_dst)
}

/// W = SK * BP2
pub(crate) fn sk_to_pk(sk: Scalar) -> G2Projective {
    G2Projective::GENERATOR * sk
}
