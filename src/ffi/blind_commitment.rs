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

use std::collections::BTreeMap;

use super::buffer::{ByteArray, ByteBuffer, FfiStr};
use super::error::{codes, status, ExternError};
use super::{
    add_indexed_message, engine, finish_context, free_context, open_context, set_field, set_nonce,
    IndexedMessageSink, MessageInput, NonceSink, Suite,
};
use crate::bbsplus::commitment::BlindSignatureContext;
use crate::bbsplus::keys::BBSplusSchemeKey;
use crate::bbsplus::message::{BBSplusMessage, ProofNonce};
use crate::errors::Error;
use crate::utils::util::g1_to_bytes;

#[derive(Default)]
pub struct BlindCommitmentContext {
    messages: BTreeMap<usize, BBSplusMessage>,
    nonce: Option<ProofNonce>,
    public_key: Option<BBSplusSchemeKey>,
}

impl IndexedMessageSink for BlindCommitmentContext {
    fn messages_mut(&mut self) -> &mut BTreeMap<usize, BBSplusMessage> {
        &mut self.messages
    }
}

impl NonceSink for BlindCommitmentContext {
    fn set_nonce(&mut self, nonce: ProofNonce) {
        self.nonce = Some(nonce);
    }
}

/// Commitment, signer context and blinding factor, each serialized
#[derive(Default)]
struct CommitmentOutput {
    commitment: Vec<u8>,
    context: Vec<u8>,
    blinding_factor: Vec<u8>,
}

impl BlindCommitmentContext {
    fn commit(self) -> Result<CommitmentOutput, Error> {
        let nonce = self.nonce.ok_or(Error::MissingInput("Nonce"))?;
        let pk = self.public_key.ok_or(Error::MissingInput("Public Key"))?;
        if self.messages.is_empty() {
            return Err(Error::EmptyInput("Messages"));
        }
        let (context, blinding_factor) = BlindSignatureContext::commit::<Suite>(&self.messages, &nonce, &pk)?;
        Ok(CommitmentOutput {
            commitment: g1_to_bytes(&context.commitment).to_vec(),
            context: context.to_bytes(),
            blinding_factor: blinding_factor.to_bytes().to_vec(),
        })
    }
}

#[no_mangle]
pub extern "C" fn bbs_blind_commitment_context_init(err: &mut ExternError) -> u64 {
    open_context(&engine().blind_commitment, "blind commitment", err)
}

#[no_mangle]
pub extern "C" fn bbs_blind_commitment_context_add_message_string(
    handle: u64,
    index: u32,
    message: FfiStr<'_>,
    err: &mut ExternError,
) -> i32 {
    add_indexed_message(&engine().blind_commitment, handle, index, MessageInput::Str(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_blind_commitment_context_add_message_bytes(
    handle: u64,
    index: u32,
    message: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_indexed_message(&engine().blind_commitment, handle, index, MessageInput::Bytes(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_blind_commitment_context_add_message_prehashed(
    handle: u64,
    index: u32,
    message: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_indexed_message(
        &engine().blind_commitment,
        handle,
        index,
        MessageInput::Prehashed(message),
        err,
    )
}

#[no_mangle]
pub extern "C" fn bbs_blind_commitment_context_set_public_key(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().blind_commitment,
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
pub extern "C" fn bbs_blind_commitment_context_set_nonce_string(
    handle: u64,
    value: FfiStr<'_>,
    err: &mut ExternError,
) -> i32 {
    set_nonce(&engine().blind_commitment, handle, MessageInput::Str(value), err)
}

#[no_mangle]
pub extern "C" fn bbs_blind_commitment_context_set_nonce_bytes(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_nonce(&engine().blind_commitment, handle, MessageInput::Bytes(value), err)
}

#[no_mangle]
pub extern "C" fn bbs_blind_commitment_context_set_nonce_prehashed(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_nonce(&engine().blind_commitment, handle, MessageInput::Prehashed(value), err)
}

/// Fills the three output buffers only on success. The handle is retired whatever the outcome.
#[no_mangle]
pub extern "C" fn bbs_blind_commitment_context_finish(
    handle: u64,
    commitment: &mut ByteBuffer,
    out_context: &mut ByteBuffer,
    blinding_factor: &mut ByteBuffer,
    err: &mut ExternError,
) -> i32 {
    let output = finish_context(
        &engine().blind_commitment,
        handle,
        "blind commitment",
        err,
        BlindCommitmentContext::commit,
    );
    if status(err) == codes::SUCCESS {
        *commitment = ByteBuffer::from_vec(output.commitment);
        *out_context = ByteBuffer::from_vec(output.context);
        *blinding_factor = ByteBuffer::from_vec(output.blinding_factor);
    }
    status(err)
}

#[no_mangle]
pub extern "C" fn free_bbs_blind_commitment(handle: u64, err: &mut ExternError) -> i32 {
    free_context(&engine().blind_commitment, handle, "blind commitment", err)
}
