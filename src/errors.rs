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

use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Error during keypair generation: {0}")]
    KeyGenError(String),
    #[error("Invalid key: {0}")]
    KeyDeserializationError(String),
    #[error("Error during computation of a Signature: {0}")]
    SignatureGenerationError(String),
    #[error("Error during computation of a Blind Signature: {0}")]
    BlindSignError(String),
    #[error("Error during hash to scalar computation")]
    HashToScalarError,
    #[error("Error mapping a message to scalar: {0}")]
    MapMessageToScalarError(String),
    #[error("Not enough Generators")]
    NotEnoughGenerators,
    #[error("Message count {found} does not match the public key ({expected} messages)")]
    MessageCountMismatch { expected: usize, found: usize },
    #[error("Message index {index} out of range for a key of {message_count} messages")]
    InvalidMessageIndex { index: usize, message_count: usize },
    #[error("Message count must be at least 1")]
    InvalidMessageCount,
    /// A point that must be a non-identity element of G1 turned out to be the identity
    #[error(" A == Identity_G1")]
    G1IdentityError,
    #[error("Error during deserialization: {0}")]
    DeserializationError(String),
    #[error("Error during computation of a Proof of Knowledge of a Signature: {0}")]
    ProofGenError(String),
    #[error("Invalid Proof of Knowledge of a Signature")]
    InvalidProofOfKnowledgeSignature,
    #[error("Invalid commitment")]
    InvalidCommitment,
    #[error("Invalid commitment proof")]
    InvalidCommitmentProof,
    #[error("Failed to compute the blind challenge")]
    ChallengeComputationFailed,

    #[error("{0} cannot be empty")]
    EmptyInput(&'static str),
    #[error("{0} must be set")]
    MissingInput(&'static str),
    #[error("Context was poisoned by an earlier panic")]
    PoisonedContext,
    #[error("Revealed messages do not match the proof: {0}")]
    RevealedMismatch(String),

    /// Non-zero status reported through an error slot
    #[error("engine error {code}: {message}")]
    Engine { code: i32, message: String },
    #[error("Secret key not found")]
    MissingSecretKey,
    #[error("Blinding factor is required for messages hidden with an external blinding")]
    MissingBlindingFactor,
    #[error("Cannot derive a BBS key from a G1 public key")]
    G1KeyDerivation,
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
    #[error("Unexpected verification status {0}")]
    UnknownStatus(i32),
}
