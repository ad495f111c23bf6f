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

use log::debug;

use super::marshal::{call, take, EncodedCalls, IndexedCalls, OpenContext};
use super::models::{
    BlindSignRequest, BlindedCommitment, CreateBlindedCommitmentRequest, CreateProofRequest, Message,
    SignRequest, UnblindSignatureRequest, VerifyBlindedCommitmentRequest, VerifyProofRequest, VerifyRequest,
};
use super::status::SignatureProofStatus;
use crate::errors::Error;
use crate::ffi::blind_commitment::*;
use crate::ffi::blind_sign::*;
use crate::ffi::buffer::{ByteArray, ByteBuffer, FfiStr};
use crate::ffi::create_proof::*;
use crate::ffi::sign::*;
use crate::ffi::verify::*;
use crate::ffi::verify_blind_commitment::*;
use crate::ffi::verify_proof::*;

fn message_count(len: usize) -> Result<u32, Error> {
    if len == 0 {
        return Err(Error::EmptyInput("Messages"));
    }
    u32::try_from(len).map_err(|_| Error::InvalidMessageCount)
}

/// Signs the messages in order with a key sized for exactly these messages
pub fn sign(request: &SignRequest) -> Result<Vec<u8>, Error> {
    let secret_key = request.key_pair.secret_key.as_ref().ok_or(Error::MissingSecretKey)?;
    let bbs_key = request.key_pair.bbs_key(message_count(request.messages.len())?)?;

    let ctx = OpenContext::open(bbs_sign_context_init, free_bbs_sign)?;
    let calls = EncodedCalls {
        string: bbs_sign_context_add_message_string,
        bytes: bbs_sign_context_add_message_bytes,
        prehashed: bbs_sign_context_add_message_prehashed,
    };
    for message in &request.messages {
        ctx.push(&calls, message)?;
    }
    ctx.set_bytes(bbs_sign_context_set_secret_key, secret_key)?;
    ctx.set_bytes(bbs_sign_context_set_public_key, &bbs_key.public_key)?;

    let mut signature = ByteBuffer::default();
    ctx.finish(|h, err| bbs_sign_context_finish(h, &mut signature, err))?;
    Ok(take(signature))
}

/// `Ok(false)` for a signature that does not match. Malformed input is an error.
pub fn verify(request: &VerifyRequest) -> Result<bool, Error> {
    let bbs_key = request.key_pair.bbs_key(message_count(request.messages.len())?)?;

    let ctx = OpenContext::open(bbs_verify_context_init, free_bbs_verify)?;
    let calls = EncodedCalls {
        string: bbs_verify_context_add_message_string,
        bytes: bbs_verify_context_add_message_bytes,
        prehashed: bbs_verify_context_add_message_prehashed,
    };
    for message in &request.messages {
        ctx.push(&calls, message)?;
    }
    ctx.set_bytes(bbs_verify_context_set_public_key, &bbs_key.public_key)?;
    ctx.set_bytes(bbs_verify_context_set_signature, &request.signature)?;

    let status = ctx.finish(|h, err| bbs_verify_context_finish(h, err))?;
    Ok(status == SIGNATURE_VALID)
}

pub fn create_blinded_commitment(request: &CreateBlindedCommitmentRequest) -> Result<BlindedCommitment, Error> {
    let ctx = OpenContext::open(bbs_blind_commitment_context_init, free_bbs_blind_commitment)?;
    let calls = IndexedCalls {
        string: bbs_blind_commitment_context_add_message_string,
        bytes: bbs_blind_commitment_context_add_message_bytes,
        prehashed: bbs_blind_commitment_context_add_message_prehashed,
    };
    for message in &request.messages {
        ctx.push_indexed(&calls, message)?;
    }
    ctx.push(&blind_commitment_nonce(), &request.nonce)?;
    ctx.set_bytes(bbs_blind_commitment_context_set_public_key, &request.public_key.public_key)?;

    let mut commitment = ByteBuffer::default();
    let mut context = ByteBuffer::default();
    let mut blinding_factor = ByteBuffer::default();
    ctx.finish(|h, err| {
        bbs_blind_commitment_context_finish(h, &mut commitment, &mut context, &mut blinding_factor, err)
    })?;
    Ok(BlindedCommitment {
        commitment: take(commitment),
        blind_sign_context: take(context),
        blinding_factor: take(blinding_factor),
    })
}

fn blind_commitment_nonce() -> EncodedCalls {
    EncodedCalls {
        string: bbs_blind_commitment_context_set_nonce_string,
        bytes: bbs_blind_commitment_context_set_nonce_bytes,
        prehashed: bbs_blind_commitment_context_set_nonce_prehashed,
    }
}

pub fn verify_blinded_commitment(request: &VerifyBlindedCommitmentRequest) -> Result<SignatureProofStatus, Error> {
    let ctx = OpenContext::open(
        bbs_verify_blind_commitment_context_init,
        free_bbs_verify_blind_commitment,
    )?;
    for index in &request.blinded_indices {
        ctx.populate(|h, err| bbs_verify_blind_commitment_context_add_blinded(h, *index, err))?;
    }
    let nonce = EncodedCalls {
        string: bbs_verify_blind_commitment_context_set_nonce_string,
        bytes: bbs_verify_blind_commitment_context_set_nonce_bytes,
        prehashed: bbs_verify_blind_commitment_context_set_nonce_prehashed,
    };
    ctx.push(&nonce, &request.nonce)?;
    ctx.set_bytes(bbs_verify_blind_commitment_context_set_proof, &request.proof)?;
    ctx.set_bytes(
        bbs_verify_blind_commitment_context_set_public_key,
        &request.public_key.public_key,
    )?;

    let code = ctx.finish(|h, err| bbs_verify_blind_commitment_context_finish(h, err))?;
    SignatureProofStatus::try_from(code)
}

pub fn blind_sign(request: &BlindSignRequest) -> Result<Vec<u8>, Error> {
    let secret_key = request.key_pair.secret_key.as_ref().ok_or(Error::MissingSecretKey)?;

    let ctx = OpenContext::open(bbs_blind_sign_context_init, free_bbs_blind_sign)?;
    let calls = IndexedCalls {
        string: bbs_blind_sign_context_add_message_string,
        bytes: bbs_blind_sign_context_add_message_bytes,
        prehashed: bbs_blind_sign_context_add_message_prehashed,
    };
    for message in &request.messages {
        ctx.push_indexed(&calls, message)?;
    }
    ctx.set_bytes(bbs_blind_sign_context_set_public_key, &request.public_key.public_key)?;
    ctx.set_bytes(bbs_blind_sign_context_set_secret_key, secret_key)?;
    ctx.set_bytes(bbs_blind_sign_context_set_commitment, &request.commitment)?;

    let mut signature = ByteBuffer::default();
    ctx.finish(|h, err| bbs_blind_sign_context_finish(h, &mut signature, err))?;
    Ok(take(signature))
}

pub fn unblind_signature(request: &UnblindSignatureRequest) -> Result<Vec<u8>, Error> {
    let mut signature = ByteBuffer::default();
    call(|err| {
        bbs_unblind_signature(
            ByteArray::from(&request.blinded_signature),
            ByteArray::from(&request.blinding_factor),
            &mut signature,
            err,
        )
    })?;
    Ok(take(signature))
}

/// # Description
/// Creates a selective disclosure proof. Every signed message is passed in signing order,
/// tagged with how it appears in the proof.
///
/// # Output:
/// the serialized proof, or [`Error::MissingBlindingFactor`] before any engine call when a message
/// needs an external blinding that the request does not carry.
pub fn create_proof(request: &CreateProofRequest) -> Result<Vec<u8>, Error> {
    request.validate()?;

    let ctx = OpenContext::open(bbs_create_proof_context_init, free_create_proof)?;
    let blinding_factor = ByteArray::from_option(request.blinding_factor.as_deref());
    for proof_message in &request.messages {
        let xtype = proof_message.proof_type as u32;
        match &proof_message.message {
            Message::Text(text) => {
                let text = super::marshal::c_string(text)?;
                ctx.populate(|h, err| {
                    bbs_create_proof_context_add_proof_message_string(
                        h,
                        FfiStr::from_cstr(&text),
                        xtype,
                        blinding_factor,
                        err,
                    )
                })?
            }
            Message::Bytes(bytes) => ctx.populate(|h, err| {
                bbs_create_proof_context_add_proof_message_bytes(h, ByteArray::from(bytes), xtype, blinding_factor, err)
            })?,
            Message::Prehashed(bytes) => ctx.populate(|h, err| {
                bbs_create_proof_context_add_proof_message_prehashed(
                    h,
                    ByteArray::from(bytes),
                    xtype,
                    blinding_factor,
                    err,
                )
            })?,
        }
    }
    let nonce = EncodedCalls {
        string: bbs_create_proof_context_set_nonce_string,
        bytes: bbs_create_proof_context_set_nonce_bytes,
        prehashed: bbs_create_proof_context_set_nonce_prehashed,
    };
    ctx.push(&nonce, &request.nonce)?;
    ctx.set_bytes(bbs_create_proof_context_set_public_key, &request.public_key.public_key)?;
    ctx.set_bytes(bbs_create_proof_context_set_signature, &request.signature)?;

    let expected = bbs_create_proof_context_size(ctx.handle());
    let mut proof = ByteBuffer::default();
    ctx.finish(|h, err| bbs_create_proof_context_finish(h, &mut proof, err))?;
    let proof = take(proof);
    debug!("proof of {} bytes, {} expected", proof.len(), expected);
    Ok(proof)
}

pub fn verify_proof(request: &VerifyProofRequest) -> Result<SignatureProofStatus, Error> {
    let ctx = OpenContext::open(bbs_verify_proof_context_init, free_verify_proof)?;
    let calls = EncodedCalls {
        string: bbs_verify_proof_context_add_message_string,
        bytes: bbs_verify_proof_context_add_message_bytes,
        prehashed: bbs_verify_proof_context_add_message_prehashed,
    };
    for message in &request.messages {
        ctx.push(&calls, message)?;
    }
    let nonce = EncodedCalls {
        string: bbs_verify_proof_context_set_nonce_string,
        bytes: bbs_verify_proof_context_set_nonce_bytes,
        prehashed: bbs_verify_proof_context_set_nonce_prehashed,
    };
    ctx.push(&nonce, &request.nonce)?;
    ctx.set_bytes(bbs_verify_proof_context_set_proof, &request.proof)?;
    ctx.set_bytes(bbs_verify_proof_context_set_public_key, &request.public_key.public_key)?;

    let code = ctx.finish(|h, err| bbs_verify_proof_context_finish(h, err))?;
    SignatureProofStatus::try_from(code)
}

/// Number of messages the proof was created over
pub fn total_message_count(proof: &[u8]) -> Result<usize, Error> {
    let count = bbs_get_total_messages_count_for_proof(ByteArray::from_slice(proof));
    usize::try_from(count).map_err(|_| Error::InvalidProofOfKnowledgeSignature)
}
