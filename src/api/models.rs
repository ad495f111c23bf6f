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

use super::keys::{BbsKey, BlsKeyPair};
use crate::errors::Error;
pub use crate::ffi::create_proof::ProofMessageType;

/// A message in one of the encodings the engine accepts
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Message {
    Text(String),
    Bytes(Vec<u8>),
    /// Already mapped to a scalar, 32 bytes big endian
    Prehashed(Vec<u8>),
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_owned())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<Vec<u8>> for Message {
    fn from(bytes: Vec<u8>) -> Self {
        Message::Bytes(bytes)
    }
}

/// Message placed at an explicit position of the signature
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct IndexedMessage {
    pub index: u32,
    pub message: Message,
}

impl IndexedMessage {
    pub fn new(index: u32, message: impl Into<Message>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ProofMessage {
    pub message: Message,
    pub proof_type: ProofMessageType,
}

impl ProofMessage {
    pub fn new(message: impl Into<Message>, proof_type: ProofMessageType) -> Self {
        Self {
            message: message.into(),
            proof_type,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SignRequest {
    pub key_pair: BlsKeyPair,
    pub messages: Vec<Message>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub key_pair: BlsKeyPair,
    pub signature: Vec<u8>,
    pub messages: Vec<Message>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CreateBlindedCommitmentRequest {
    pub public_key: BbsKey,
    pub messages: Vec<IndexedMessage>,
    pub nonce: Message,
}

/// Output of a blind commitment. The holder keeps `blinding_factor`, the signer gets the rest.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BlindedCommitment {
    pub commitment: Vec<u8>,
    pub blind_sign_context: Vec<u8>,
    pub blinding_factor: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct VerifyBlindedCommitmentRequest {
    pub public_key: BbsKey,
    /// The blind sign context of the commitment
    pub proof: Vec<u8>,
    pub blinded_indices: Vec<u32>,
    pub nonce: Message,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BlindSignRequest {
    pub key_pair: BlsKeyPair,
    pub public_key: BbsKey,
    pub commitment: Vec<u8>,
    /// Messages known to the signer, at indices disjoint from the committed ones
    pub messages: Vec<IndexedMessage>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UnblindSignatureRequest {
    pub blinded_signature: Vec<u8>,
    pub blinding_factor: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CreateProofRequest {
    pub public_key: BbsKey,
    pub messages: Vec<ProofMessage>,
    pub signature: Vec<u8>,
    pub blinding_factor: Option<Vec<u8>>,
    pub nonce: Message,
}

impl CreateProofRequest {
    /// Fails if a message is hidden with an external blinding but no blinding factor is given
    pub fn new(
        public_key: BbsKey,
        messages: Vec<ProofMessage>,
        signature: Vec<u8>,
        blinding_factor: Option<Vec<u8>>,
        nonce: Message,
    ) -> Result<Self, Error> {
        let request = Self {
            public_key,
            messages,
            signature,
            blinding_factor,
            nonce,
        };
        request.validate()?;
        Ok(request)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        let needs_factor = self
            .messages
            .iter()
            .any(|m| m.proof_type == ProofMessageType::HiddenExternalBlinding);
        let has_factor = self.blinding_factor.as_ref().map_or(false, |bf| !bf.is_empty());
        if needs_factor && !has_factor {
            return Err(Error::MissingBlindingFactor);
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct VerifyProofRequest {
    pub public_key: BbsKey,
    pub proof: Vec<u8>,
    /// Revealed messages in ascending index order
    pub messages: Vec<Message>,
    pub nonce: Message,
}
