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

use ffi_support::HandleError;
use log::trace;
use serde::{Deserialize, Serialize};

use super::buffer::{ByteArray, ByteBuffer, FfiStr};
use super::error::{codes, status, ExternError};
use super::{engine, finish_context, free_context, open_context, set_field, set_nonce, MessageInput, NonceSink, Suite};
use crate::bbsplus::keys::BBSplusSchemeKey;
use crate::bbsplus::message::ProofNonce;
use crate::bbsplus::proof::{BBSplusPoKSignature, HiddenMessage, ProofMessage};
use crate::bbsplus::signature::BBSplusSignature;
use crate::errors::Error;

/// How a message takes part in a proof, as passed across the boundary
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ProofMessageType {
    Revealed = 1,
    HiddenProofSpecificBlinding = 2,
    HiddenExternalBlinding = 3,
}

impl TryFrom<u32> for ProofMessageType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ProofMessageType::Revealed),
            2 => Ok(ProofMessageType::HiddenProofSpecificBlinding),
            3 => Ok(ProofMessageType::HiddenExternalBlinding),
            other => Err(Error::InvalidMessage(format!("unknown proof message type {}", other))),
        }
    }
}

#[derive(Default)]
pub struct CreateProofContext {
    messages: Vec<ProofMessage>,
    nonce: Option<ProofNonce>,
    public_key: Option<BBSplusSchemeKey>,
    signature: Option<BBSplusSignature>,
}

impl NonceSink for CreateProofContext {
    fn set_nonce(&mut self, nonce: ProofNonce) {
        self.nonce = Some(nonce);
    }
}

impl CreateProofContext {
    fn hidden_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.is_revealed()).count()
    }

    fn prove(self) -> Result<Vec<u8>, Error> {
        let signature = self.signature.ok_or(Error::MissingInput("Signature"))?;
        let pk = self.public_key.ok_or(Error::MissingInput("Public Key"))?;
        let nonce = self.nonce.ok_or(Error::MissingInput("Nonce"))?;
        if self.messages.is_empty() {
            return Err(Error::EmptyInput("Messages"));
        }
        let proof = BBSplusPoKSignature::proof_gen::<Suite>(&signature, &pk, &self.messages, &nonce)?;
        Ok(proof.to_bytes())
    }
}

fn proof_message(
    message: MessageInput<'_>,
    xtype: u32,
    blinding_factor: ByteArray<'_>,
) -> Result<ProofMessage, Error> {
    let kind = ProofMessageType::try_from(xtype)?;
    let m = message.to_message()?;
    Ok(match kind {
        ProofMessageType::Revealed => ProofMessage::Revealed(m),
        ProofMessageType::HiddenProofSpecificBlinding => {
            ProofMessage::Hidden(HiddenMessage::ProofSpecificBlinding(m))
        }
        ProofMessageType::HiddenExternalBlinding => {
            let blinding = HiddenMessage::external_blinding::<Suite>(blinding_factor.required("Blinding Factor")?)?;
            ProofMessage::Hidden(HiddenMessage::ExternalBlinding(m, blinding))
        }
    })
}

fn add_proof_message(
    handle: u64,
    message: MessageInput<'_>,
    xtype: u32,
    blinding_factor: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().create_proof,
        handle,
        err,
        || proof_message(message, xtype, blinding_factor),
        |ctx, m| {
            ctx.messages.push(m);
            Ok(())
        },
    )
}

/// Expected length of the proof for the messages added so far, -1 for an unknown handle
#[no_mangle]
pub extern "C" fn bbs_create_proof_context_size(handle: u64) -> i32 {
    engine()
        .create_proof
        .get_u64(handle, |ctx| -> Result<i32, HandleError> {
            Ok(BBSplusPoKSignature::serialized_length(ctx.messages.len(), ctx.hidden_count()) as i32)
        })
        .unwrap_or(-1)
}

#[no_mangle]
pub extern "C" fn bbs_create_proof_context_init(err: &mut ExternError) -> u64 {
    open_context(&engine().create_proof, "create proof", err)
}

#[no_mangle]
pub extern "C" fn bbs_create_proof_context_add_proof_message_string(
    handle: u64,
    message: FfiStr<'_>,
    xtype: u32,
    blinding_factor: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_proof_message(handle, MessageInput::Str(message), xtype, blinding_factor, err)
}

#[no_mangle]
pub extern "C" fn bbs_create_proof_context_add_proof_message_bytes(
    handle: u64,
    message: ByteArray<'_>,
    xtype: u32,
    blinding_factor: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_proof_message(handle, MessageInput::Bytes(message), xtype, blinding_factor, err)
}

#[no_mangle]
pub extern "C" fn bbs_create_proof_context_add_proof_message_prehashed(
    handle: u64,
    message: ByteArray<'_>,
    xtype: u32,
    blinding_factor: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_proof_message(handle, MessageInput::Prehashed(message), xtype, blinding_factor, err)
}

#[no_mangle]
pub extern "C" fn bbs_create_proof_context_set_signature(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().create_proof,
        handle,
        err,
        || BBSplusSignature::from_bytes(value.required("Signature")?),
        |ctx, signature| {
            ctx.signature = Some(signature);
            Ok(())
        },
    )
}

#[no_mangle]
pub extern "C" fn bbs_create_proof_context_set_public_key(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().create_proof,
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
pub extern "C" fn bbs_create_proof_context_set_nonce_string(
    handle: u64,
    value: FfiStr<'_>,
    err: &mut ExternError,
) -> i32 {
    set_nonce(&engine().create_proof, handle, MessageInput::Str(value), err)
}

#[no_mangle]
pub extern "C" fn bbs_create_proof_context_set_nonce_bytes(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_nonce(&engine().create_proof, handle, MessageInput::Bytes(value), err)
}

#[no_mangle]
pub extern "C" fn bbs_create_proof_context_set_nonce_prehashed(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_nonce(&engine().create_proof, handle, MessageInput::Prehashed(value), err)
}

#[no_mangle]
pub extern "C" fn bbs_create_proof_context_finish(
    handle: u64,
    proof: &mut ByteBuffer,
    err: &mut ExternError,
) -> i32 {
    let bytes = finish_context(
        &engine().create_proof,
        handle,
        "create proof",
        err,
        CreateProofContext::prove,
    );
    if status(err) == codes::SUCCESS {
        trace!("proof of {} bytes", bytes.len());
        *proof = ByteBuffer::from_vec(bytes);
    }
    status(err)
}

#[no_mangle]
pub extern "C" fn free_create_proof(handle: u64, err: &mut ExternError) -> i32 {
    free_context(&engine().create_proof, handle, "create proof", err)
}
