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

use super::buffer::{ByteArray, ByteBuffer, FfiStr};
use super::error::{codes, status, ExternError};
use super::{add_message, engine, finish_context, free_context, open_context, set_field, MessageInput, MessageSink};
use crate::bbsplus::keys::{BBSplusSchemeKey, BBSplusSecretKey};
use crate::bbsplus::message::BBSplusMessage;
use crate::bbsplus::signature::BBSplusSignature;
use crate::errors::Error;

#[derive(Default)]
pub struct SignContext {
    messages: Vec<BBSplusMessage>,
    public_key: Option<BBSplusSchemeKey>,
    secret_key: Option<BBSplusSecretKey>,
}

impl MessageSink for SignContext {
    fn push_message(&mut self, message: BBSplusMessage) {
        self.messages.push(message);
    }
}

impl SignContext {
    fn sign(self) -> Result<Vec<u8>, Error> {
        let sk = self.secret_key.ok_or(Error::MissingInput("Secret Key"))?;
        let pk = self.public_key.ok_or(Error::MissingInput("Public Key"))?;
        if self.messages.is_empty() {
            return Err(Error::EmptyInput("Messages"));
        }
        let signature = BBSplusSignature::sign(&self.messages, &sk, &pk)?;
        Ok(signature.to_bytes().to_vec())
    }
}

#[no_mangle]
pub extern "C" fn bbs_signature_size() -> i32 {
    BBSplusSignature::SIGNATURE_LENGTH as i32
}

#[no_mangle]
pub extern "C" fn bbs_sign_context_init(err: &mut ExternError) -> u64 {
    open_context(&engine().sign, "sign", err)
}

#[no_mangle]
pub extern "C" fn bbs_sign_context_add_message_string(
    handle: u64,
    message: FfiStr<'_>,
    err: &mut ExternError,
) -> i32 {
    add_message(&engine().sign, handle, MessageInput::Str(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_sign_context_add_message_bytes(
    handle: u64,
    message: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_message(&engine().sign, handle, MessageInput::Bytes(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_sign_context_add_message_prehashed(
    handle: u64,
    message: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    add_message(&engine().sign, handle, MessageInput::Prehashed(message), err)
}

#[no_mangle]
pub extern "C" fn bbs_sign_context_set_secret_key(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().sign,
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
pub extern "C" fn bbs_sign_context_set_public_key(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().sign,
        handle,
        err,
        || BBSplusSchemeKey::from_bytes(value.required("Public Key")?),
        |ctx, pk| {
            ctx.public_key = Some(pk);
            Ok(())
        },
    )
}

/// Writes the signature into `signature`. The handle is retired whatever the outcome.
#[no_mangle]
pub extern "C" fn bbs_sign_context_finish(
    handle: u64,
    signature: &mut ByteBuffer,
    err: &mut ExternError,
) -> i32 {
    let bytes = finish_context(&engine().sign, handle, "sign", err, SignContext::sign);
    if status(err) == codes::SUCCESS {
        *signature = ByteBuffer::from_vec(bytes);
    }
    status(err)
}

#[no_mangle]
pub extern "C" fn free_bbs_sign(handle: u64, err: &mut ExternError) -> i32 {
    free_context(&engine().sign, handle, "sign", err)
}
