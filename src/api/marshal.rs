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

use std::ffi::CString;

use log::debug;

use super::models::{IndexedMessage, Message};
use crate::errors::Error;
use crate::ffi::buffer::{ByteArray, ByteBuffer, FfiStr};
use crate::ffi::error::{codes, status, take_message, ExternError};

pub(crate) type InitFn = extern "C" fn(&mut ExternError) -> u64;
pub(crate) type FreeFn = extern "C" fn(u64, &mut ExternError) -> i32;
type StringFn = extern "C" fn(u64, FfiStr<'_>, &mut ExternError) -> i32;
type BytesFn = extern "C" fn(u64, ByteArray<'_>, &mut ExternError) -> i32;
type IndexedStringFn = extern "C" fn(u64, u32, FfiStr<'_>, &mut ExternError) -> i32;
type IndexedBytesFn = extern "C" fn(u64, u32, ByteArray<'_>, &mut ExternError) -> i32;

/// Turns a failed call into [`Error::Engine`], releasing its message
pub(crate) fn check(err: &mut ExternError) -> Result<(), Error> {
    let code = status(err);
    if code == codes::SUCCESS {
        return Ok(());
    }
    let message = take_message(err).unwrap_or_default();
    Err(Error::Engine { code, message })
}

/// Runs one call against a fresh error slot and checks it before the result is used
pub(crate) fn call<R>(f: impl FnOnce(&mut ExternError) -> R) -> Result<R, Error> {
    let mut err = ExternError::success();
    let out = f(&mut err);
    check(&mut err)?;
    Ok(out)
}

pub(crate) fn take(buffer: ByteBuffer) -> Vec<u8> {
    buffer.destroy_into_vec()
}

pub(crate) fn c_string(text: &str) -> Result<CString, Error> {
    CString::new(text).map_err(|_| Error::InvalidMessage("text contains a NUL byte".to_owned()))
}

/// The three populate calls that take a message or nonce in one of its encodings
pub(crate) struct EncodedCalls {
    pub(crate) string: StringFn,
    pub(crate) bytes: BytesFn,
    pub(crate) prehashed: BytesFn,
}

pub(crate) struct IndexedCalls {
    pub(crate) string: IndexedStringFn,
    pub(crate) bytes: IndexedBytesFn,
    pub(crate) prehashed: IndexedBytesFn,
}

/// Context opened on the engine. Dropping it before [`OpenContext::finish`] frees the handle.
pub(crate) struct OpenContext {
    handle: u64,
    free: FreeFn,
    finished: bool,
}

impl OpenContext {
    pub(crate) fn open(init: InitFn, free: FreeFn) -> Result<Self, Error> {
        let handle = call(|err| init(err))?;
        Ok(Self {
            handle,
            free,
            finished: false,
        })
    }

    pub(crate) fn handle(&self) -> u64 {
        self.handle
    }

    pub(crate) fn populate(&self, f: impl FnOnce(u64, &mut ExternError) -> i32) -> Result<(), Error> {
        call(|err| f(self.handle, err)).map(|_| ())
    }

    pub(crate) fn push(&self, calls: &EncodedCalls, message: &Message) -> Result<(), Error> {
        match message {
            Message::Text(text) => {
                let text = c_string(text)?;
                self.populate(|h, err| (calls.string)(h, FfiStr::from_cstr(&text), err))
            }
            Message::Bytes(bytes) => self.populate(|h, err| (calls.bytes)(h, ByteArray::from(bytes), err)),
            Message::Prehashed(bytes) => {
                self.populate(|h, err| (calls.prehashed)(h, ByteArray::from(bytes), err))
            }
        }
    }

    pub(crate) fn push_indexed(&self, calls: &IndexedCalls, message: &IndexedMessage) -> Result<(), Error> {
        let index = message.index;
        match &message.message {
            Message::Text(text) => {
                let text = c_string(text)?;
                self.populate(|h, err| (calls.string)(h, index, FfiStr::from_cstr(&text), err))
            }
            Message::Bytes(bytes) => {
                self.populate(|h, err| (calls.bytes)(h, index, ByteArray::from(bytes), err))
            }
            Message::Prehashed(bytes) => {
                self.populate(|h, err| (calls.prehashed)(h, index, ByteArray::from(bytes), err))
            }
        }
    }

    pub(crate) fn set_bytes(
        &self,
        f: extern "C" fn(u64, ByteArray<'_>, &mut ExternError) -> i32,
        value: &[u8],
    ) -> Result<(), Error> {
        self.populate(|h, err| f(h, ByteArray::from_slice(value), err))
    }

    /// Consumes the context. Errors are checked before the output is returned.
    pub(crate) fn finish<R>(mut self, f: impl FnOnce(u64, &mut ExternError) -> R) -> Result<R, Error> {
        self.finished = true;
        let handle = self.handle;
        call(|err| f(handle, err))
    }
}

impl Drop for OpenContext {
    fn drop(&mut self) {
        if !self.finished {
            let mut err = ExternError::success();
            (self.free)(self.handle, &mut err);
            take_message(&mut err);
            debug!("abandoned context {:#x} freed", self.handle);
        }
    }
}
