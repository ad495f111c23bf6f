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
use super::{add_message, engine, finish_context, free_context, open_context, set_field, MessageInput, MessageSink};
use crate::bbsplus::keys::BBSplusSchemeKey;
use crate::bbsplus::message::BBSplusMessage;
use crate::bbsplus::signature::BBSplusSignature;
use crate::errors::Error;

/// Status of a valid signature
pub const SIGNATURE_VALID: i32 = 0;
/// Status of a well formed signature that does not verify
pub const SIGNATURE_INVALID: i32 = 1;

#[derive(Default)]
pub struct VerifyContext {
    messages: Vec<BBSplusMessage>,
    public_key: Option<BBSplusSchemeKey>,
    signature: Option<BBSplusSignature>,
}

impl MessageSink for VerifyContext {
    fn push_message(&mut self, message: BBSplusMessage) {
        self.messages.push(message);
    }
}

impl VerifyContext {
    fn verify(self) -> Result<i32, Error> {
        let signature = self.signature.ok_or(Error::MissingInput("Signature"))?;
        let pk = self.public_key.ok_or(Error::MissingInput("Public Key"))?;
        if self.messages.is_empty() {
            return Err(Error::EmptyInput("Messages"));
        }
        if signature.verify(&pk, &self.messages)? {
            Ok(SIGNATURE_VALID)
        } else {
            Ok(SIGNATURE_INVALID)
        }
    }
}

#[no_mangle]
pub extern "C" fn bbs_verify_context_init(err: &mut ExternError) -> u64 {
    open_context(&engine().verify, "verify", err)
}

#[no_mangle]
pub extern "C" fn bbs_verify_context_add_message_string(
    handle: u64,
    message: FfiStr<'_>,
    err: &mut ExternError,
) -> i32 {
    add_message(&engine().verify, handle, MessageInput::Str(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_verify_context_add_message_bytes(
    handle: u64,
    message: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_message(&engine().verify, handle, MessageInput::Bytes(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_verify_context_add_message_prehashed(
    handle: u64,
    message: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_message(&engine().verify, handle, MessageInput::Prehashed(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_verify_context_set_public_key(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().verify,
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
pub extern "C" fn bbs_verify_context_set_signature(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().verify,
        handle,
        err,
        || BBSplusSignature::from_bytes(value.required("Signature")?),
        |ctx, signature| {
            ctx.signature = Some(signature);
            Ok(())
        },
    )
}

/// Returns [`SIGNATURE_VALID`] or [`SIGNATURE_INVALID`]. Only meaningful when `err` reports success.
#[no_mangle]
pub extern "C" fn bbs_verify_context_finish(handle: u64, err: &mut ExternError) -> i32 {
    finish_context(&engine().verify, handle, "verify", err, VerifyContext::verify)
}

#[no_mangle]
pub extern "C" fn free_bbs_verify(handle: u64, err: &mut ExternError) -> i32 {
    free_context(&engine().verify, handle, "verify", err)
}
