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

use bls12_381_plus::Scalar;
use elliptic_curve::hash2curve::ExpandMsg;
use serde::{Deserialize, Serialize};

use super::ciphersuites::BbsCiphersuite;
use crate::errors::Error;
use crate::utils::util::{hash_to_scalar, ScalarExt};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BBSplusMessage {
    pub value: Scalar,
}

impl BBSplusMessage {
    pub fn new(msg: Scalar) -> Self {
        Self { value: msg }
    }

    /// Maps an arbitrary non-empty octet string to a scalar
    pub fn hash<CS: BbsCiphersuite>(data: &[u8]) -> Result<Self, Error>
    where
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        if data.is_empty() {
            return Err(Error::EmptyInput("Message"));
        }
        let value = hash_to_scalar::<CS>(data, &CS::map_msg_dst())
            .map_err(|e| Error::MapMessageToScalarError(e.to_string()))?;
        Ok(Self { value })
    }

    /// Takes a message that was already mapped to a scalar, as 32 bytes big endian
    pub fn from_prehashed(data: &[u8]) -> Result<Self, Error> {
        if data.is_empty() {
            return Err(Error::EmptyInput("Message"));
        }
        let value = Scalar::from_bytes_be(data)
            .map_err(|e| Error::MapMessageToScalarError(e.to_string()))?;
        Ok(Self { value })
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.value.to_bytes_be()
    }
}

/// Nonce binding a proof to one verifier session
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ProofNonce(pub Scalar);

impl ProofNonce {
    /// Empty nonces are valid: they are hashed like any other octet string
    pub fn hash<CS: BbsCiphersuite>(data: &[u8]) -> Result<Self, Error>
    where
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        hash_to_scalar::<CS>(data, &CS::nonce_dst()).map(Self)
    }

    pub fn from_prehashed(data: &[u8]) -> Result<Self, Error> {
        Scalar::from_bytes_be(data).map(Self)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes_be()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbsplus::ciphersuites::{Bls12381Sha256, Bls12381Shake256};

    #[test]
    fn empty_message_is_rejected() {
        assert_eq!(
            BBSplusMessage::hash::<Bls12381Sha256>(b"").unwrap_err(),
            Error::EmptyInput("Message")
        );
        assert_eq!(
            BBSplusMessage::from_prehashed(&[]).unwrap_err(),
            Error::EmptyInput("Message")
        );
    }

    #[test]
    fn message_and_nonce_domains_differ() {
        let m = BBSplusMessage::hash::<Bls12381Sha256>(b"abc").unwrap();
        let n = ProofNonce::hash::<Bls12381Sha256>(b"abc").unwrap();
        assert_ne!(m.value, n.0);
    }

    #[test]
    fn ciphersuites_map_differently() {
        let a = BBSplusMessage::hash::<Bls12381Sha256>(b"abc").unwrap();
        let b = BBSplusMessage::hash::<Bls12381Shake256>(b"abc").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn prehashed_round_trip() {
        let m = BBSplusMessage::hash::<Bls12381Sha256>(b"prehash me").unwrap();
        let p = BBSplusMessage::from_prehashed(&m.to_bytes()).unwrap();
        assert_eq!(m, p);
        assert!(BBSplusMessage::from_prehashed(&[1u8; 16]).is_err());
    }
}
