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

use super::buffer::{ByteArray, FfiStr};
use super::error::ExternError;
use super::{
    add_message, engine, finish_context, free_context, open_context, set_field, set_nonce, MessageInput,
    MessageSink, NonceSink, Suite,
};
use crate::bbsplus::keys::BBSplusSchemeKey;
use crate::bbsplus::message::{BBSplusMessage, ProofNonce};
use crate::bbsplus::proof::BBSplusPoKSignature;
use crate::errors::Error;

/// Revealed messages arrive in ascending index order
#[derive(Default)]
pub struct VerifyProofContext {
    messages: Vec<BBSplusMessage>,
    nonce: Option<ProofNonce>,
    proof: Option<BBSplusPoKSignature>,
    public_key: Option<BBSplusSchemeKey>,
}

impl MessageSink for VerifyProofContext {
    fn push_message(&mut self, message: BBSplusMessage) {
        self.messages.push(message);
    }
}

impl NonceSink for VerifyProofContext {
    fn set_nonce(&mut self, nonce: ProofNonce) {
        self.nonce = Some(nonce);
    }
}

impl VerifyProofContext {
    fn verify(self) -> Result<i32, Error> {
        let proof = self.proof.ok_or(Error::MissingInput("Proof"))?;
        let pk = self.public_key.ok_or(Error::MissingInput("Public Key"))?;
        let nonce = self.nonce.ok_or(Error::MissingInput("Nonce"))?;
        let status = proof.proof_verify::<Suite>(&pk, &self.messages, &nonce)?;
        Ok(status.code())
    }
}

/// Message count encoded in a proof, -1 if the proof is too short
#[no_mangle]
pub extern "C" fn bbs_get_total_messages_count_for_proof(proof: ByteArray<'_>) -> i32 {
    BBSplusPoKSignature::total_message_count(proof.as_slice())
        .map(|count| count as i32)
        .unwrap_or(-1)
}

#[no_mangle]
pub extern "C" fn bbs_verify_proof_context_init(err: &mut ExternError) -> u64 {
    open_context(&engine().verify_proof, "verify proof", err)
}

#[no_mangle]
pub extern "C" fn bbs_verify_proof_context_add_message_string(
    handle: u64,
    message: FfiStr<'_>,
    err: &mut ExternError,
) -> i32 {
    add_message(&engine().verify_proof, handle, MessageInput::Str(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_verify_proof_context_add_message_bytes(
    handle: u64,
    message: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_message(&engine().verify_proof, handle, MessageInput::Bytes(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_verify_proof_context_add_message_prehashed(
    handle: u64,
    message: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_message(&engine().verify_proof, handle, MessageInput::Prehashed(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_verify_proof_context_set_proof(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().verify_proof,
        handle,
        err,
        || BBSplusPoKSignature::from_bytes(value.required("Proof")?),
        |ctx, proof| {
            ctx.proof = Some(proof);
            Ok(())
        },
    )
}

#[no_mangle]
pub extern "C" fn bbs_verify_proof_context_set_public_key(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().verify_proof,
        handle,
        err,
        || BBSplusSchemeKey::from_bytes(value.required("Public Key")?),
        |ctx, pk| {
            ctx.public_key = Some(pk);
            Ok(())
        },
    )
}

#[no_mangle]
pub extern "C" fn bbs_verify_proof_context_set_nonce_string(
    handle: u64,
    value: FfiStr<'_>,
    err: &mut ExternError,
) -> i32 {
    set_nonce(&engine().verify_proof, handle, MessageInput::Str(value), err)
}

#[no_mangle]
pub extern "C" fn bbs_verify_proof_context_set_nonce_bytes(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_nonce(&engine().verify_proof, handle, MessageInput::Bytes(value), err)
}

#[no_mangle]
pub extern "C" fn bbs_verify_proof_context_set_nonce_prehashed(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_nonce(&engine().verify_proof, handle, MessageInput::Prehashed(value), err)
}

/// Returns 200, 400, 401 or 402. Only meaningful when `err` reports success.
#[no_mangle]
pub extern "C" fn bbs_verify_proof_context_finish(handle: u64, err: &mut ExternError) -> i32 {
    finish_context(
        &engine().verify_proof,
        handle,
        "verify proof",
        err,
        VerifyProofContext::verify,
    )
}

#[no_mangle]
pub extern "C" fn free_verify_proof(handle: u64, err: &mut ExternError) -> i32 {
    free_context(&engine().verify_proof, handle, "verify proof", err)
}
