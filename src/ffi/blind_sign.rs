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

use bls12_381_plus::G1Projective;
use ffi_support::call_with_result;

use super::buffer::{ByteArray, ByteBuffer, FfiStr};
use super::error::{codes, status, ExternError};
use super::{
    add_indexed_message, engine, finish_context, free_context, open_context, set_field,
    IndexedMessageSink, MessageInput,
};
use crate::bbsplus::blind::BBSplusBlindSignature;
use crate::bbsplus::commitment::BlindFactor;
use crate::bbsplus::keys::{BBSplusSchemeKey, BBSplusSecretKey};
use crate::bbsplus::message::BBSplusMessage;
use crate::errors::Error;
use crate::utils::util::g1_from_bytes;

#[derive(Default)]
pub struct BlindSignContext {
    messages: BTreeMap<usize, BBSplusMessage>,
    commitment: Option<G1Projective>,
    public_key: Option<BBSplusSchemeKey>,
    secret_key: Option<BBSplusSecretKey>,
}

impl IndexedMessageSink for BlindSignContext {
    fn messages_mut(&mut self) -> &mut BTreeMap<usize, BBSplusMessage> {
        &mut self.messages
    }
}

impl BlindSignContext {
    fn blind_sign(self) -> Result<Vec<u8>, Error> {
        let sk = self.secret_key.ok_or(Error::MissingInput("Secret Key"))?;
        let pk = self.public_key.ok_or(Error::MissingInput("Public Key"))?;
        let commitment = self.commitment.ok_or(Error::MissingInput("Commitment"))?;
        if self.messages.is_empty() {
            return Err(Error::EmptyInput("Messages"));
        }
        let signature = BBSplusBlindSignature::blind_sign(&commitment, &self.messages, &sk, &pk)?;
        Ok(signature.to_bytes().to_vec())
    }
}

#[no_mangle]
pub extern "C" fn bbs_blind_signature_size() -> i32 {
    BBSplusBlindSignature::SIGNATURE_LENGTH as i32
}

#[no_mangle]
pub extern "C" fn bbs_blinding_factor_size() -> i32 {
    BlindFactor::LENGTH as i32
}

#[no_mangle]
pub extern "C" fn bbs_blind_sign_context_init(err: &mut ExternError) -> u64 {
    open_context(&engine().blind_sign, "blind sign", err)
}

#[no_mangle]
pub extern "C" fn bbs_blind_sign_context_add_message_string(
    handle: u64,
    index: u32,
    message: FfiStr<'_>,
    err: &mut ExternError,
) -> i32 {
    add_indexed_message(&engine().blind_sign, handle, index, MessageInput::Str(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_blind_sign_context_add_message_bytes(
    handle: u64,
    index: u32,
    message: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_indexed_message(&engine().blind_sign, handle, index, MessageInput::Bytes(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_blind_sign_context_add_message_prehashed(
    handle: u64,
    index: u32,
    message: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_indexed_message(&engine().blind_sign, handle, index, MessageInput::Prehashed(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_blind_sign_context_set_public_key(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().blind_sign,
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
pub extern "C" fn bbs_blind_sign_context_set_secret_key(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().blind_sign,
        handle,
        err,
        || BBSplusSecretKey::from_bytes(value.required("Secret Key")?),
        |ctx, sk| {
            ctx.secret_key = Some(sk);
            Ok(())
        },
    )
}

#[no_mangle]
pub extern "C" fn bbs_blind_sign_context_set_commitment(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().blind_sign,
        handle,
        err,
        || g1_from_bytes(value.required("Commitment")?).map_err(|_| Error::InvalidCommitment),
        |ctx, commitment| {
            ctx.commitment = Some(commitment);
            Ok(())
        },
    )
}

#[no_mangle]
pub extern "C" fn bbs_blind_sign_context_finish(
    handle: u64,
    blinded_signature: &mut ByteBuffer,
    err: &mut ExternError,
) -> i32 {
    let bytes = finish_context(
        &engine().blind_sign,
        handle,
        "blind sign",
        err,
        BlindSignContext::blind_sign,
    );
    if status(err) == codes::SUCCESS {
        *blinded_signature = ByteBuffer::from_vec(bytes);
    }
    status(err)
}

#[no_mangle]
pub extern "C" fn free_bbs_blind_sign(handle: u64, err: &mut ExternError) -> i32 {
    free_context(&engine().blind_sign, handle, "blind sign", err)
}

/// Completes a blind signature with the blinding factor kept from the commitment
#[no_mangle]
pub extern "C" fn bbs_unblind_signature(
    blind_signature: ByteArray<'_>,
    blinding_factor: ByteArray<'_>,
    unblind_signature: &mut ByteBuffer,
    err: &mut ExternError,
) -> i32 {
    let bytes = call_with_result(err, || -> Result<ByteBuffer, Error> {
        let blind = BBSplusBlindSignature::from_bytes(blind_signature.required("Blind Signature")?)?;
        let bf = BlindFactor::from_bytes(blinding_factor.required("Blinding Factor")?)?;
        Ok(ByteBuffer::from_vec(blind.to_unblinded(&bf).to_bytes().to_vec()))
    });
    if status(err) == codes::SUCCESS {
        *unblind_signature = bytes;
    }
    status(err)
}
