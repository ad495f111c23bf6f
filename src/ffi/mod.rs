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

//! C ABI of the engine.
//!
//! Every operation is driven through a context: `*_context_init` opens a handle, the
//! `add_*`/`set_*` calls fill it and `*_context_finish` consumes it and runs the computation.
//! Each call reports failures through its trailing [`ExternError`].

pub mod blind_commitment;
pub mod blind_sign;
pub mod bls;
pub mod buffer;
pub mod create_proof;
pub mod error;
pub mod sign;
pub mod verify;
pub mod verify_blind_commitment;
pub mod verify_proof;

use std::panic::{AssertUnwindSafe, UnwindSafe};

use ffi_support::{call_with_result, ConcurrentHandleMap};
use lazy_static::lazy_static;
use log::{debug, info, trace};

use crate::bbsplus::message::{BBSplusMessage, ProofNonce};
use crate::errors::Error;
use blind_commitment::BlindCommitmentContext;
use blind_sign::BlindSignContext;
use buffer::{ByteArray, FfiStr};
use create_proof::CreateProofContext;
use error::{status, ExternError};
use sign::SignContext;
use verify::VerifyContext;
use verify_blind_commitment::VerifyBlindCommitmentContext;
use verify_proof::VerifyProofContext;

#[cfg(all(feature = "sha256", feature = "shake256"))]
compile_error!("features `sha256` and `shake256` select different ciphersuites, enable only one");

#[cfg(not(any(feature = "sha256", feature = "shake256")))]
compile_error!("enable one ciphersuite feature: `sha256` or `shake256`");

/// Ciphersuite used by the engine
#[cfg(feature = "shake256")]
pub type Suite = crate::bbsplus::ciphersuites::Bls12381Shake256;
#[cfg(feature = "sha256")]
pub type Suite = crate::bbsplus::ciphersuites::Bls12381Sha256;

/// Open contexts of every operation
pub(crate) struct Engine {
    pub(crate) sign: ConcurrentHandleMap<SignContext>,
    pub(crate) verify: ConcurrentHandleMap<VerifyContext>,
    pub(crate) blind_commitment: ConcurrentHandleMap<BlindCommitmentContext>,
    pub(crate) verify_blind_commitment: ConcurrentHandleMap<VerifyBlindCommitmentContext>,
    pub(crate) blind_sign: ConcurrentHandleMap<BlindSignContext>,
    pub(crate) create_proof: ConcurrentHandleMap<CreateProofContext>,
    pub(crate) verify_proof: ConcurrentHandleMap<VerifyProofContext>,
}

impl Engine {
    fn new() -> Self {
        Self {
            sign: ConcurrentHandleMap::new(),
            verify: ConcurrentHandleMap::new(),
            blind_commitment: ConcurrentHandleMap::new(),
            verify_blind_commitment: ConcurrentHandleMap::new(),
            blind_sign: ConcurrentHandleMap::new(),
            create_proof: ConcurrentHandleMap::new(),
            verify_proof: ConcurrentHandleMap::new(),
        }
    }
}

lazy_static! {
    static ref ENGINE: Engine = {
        info!("BBS+ engine loaded ({})", String::from_utf8_lossy(<Suite as crate::bbsplus::ciphersuites::BbsCiphersuite>::ID));
        Engine::new()
    };
}

pub(crate) fn engine() -> &'static Engine {
    &ENGINE
}

/// One of the three encodings a message or nonce can be supplied in
pub(crate) enum MessageInput<'a> {
    Str(FfiStr<'a>),
    Bytes(ByteArray<'a>),
    Prehashed(ByteArray<'a>),
}

impl MessageInput<'_> {
    pub(crate) fn to_message(self) -> Result<BBSplusMessage, Error> {
        match self {
            MessageInput::Str(s) => {
                let text = s.as_opt_str().ok_or(Error::MissingInput("Message"))?;
                BBSplusMessage::hash::<Suite>(text.as_bytes())
            }
            MessageInput::Bytes(b) => BBSplusMessage::hash::<Suite>(b.required("Message")?),
            MessageInput::Prehashed(b) => BBSplusMessage::from_prehashed(b.required("Message")?),
        }
    }

    /// An absent nonce is an error, an empty one is hashed like any other value
    pub(crate) fn to_nonce(self) -> Result<ProofNonce, Error> {
        match self {
            MessageInput::Str(s) => {
                let text = s.as_opt_str().ok_or(Error::MissingInput("Nonce"))?;
                ProofNonce::hash::<Suite>(text.as_bytes())
            }
            MessageInput::Bytes(b) => {
                ProofNonce::hash::<Suite>(b.as_opt_slice().ok_or(Error::MissingInput("Nonce"))?)
            }
            MessageInput::Prehashed(b) => ProofNonce::from_prehashed(b.required("Nonce")?),
        }
    }
}

/// Contexts that take messages in signing order
pub(crate) trait MessageSink {
    fn push_message(&mut self, message: BBSplusMessage);
}

/// Contexts that take messages at explicit indices
pub(crate) trait IndexedMessageSink {
    fn messages_mut(&mut self) -> &mut std::collections::BTreeMap<usize, BBSplusMessage>;

    fn insert_message(&mut self, index: usize, message: BBSplusMessage) -> Result<(), Error> {
        match self.messages_mut().entry(index) {
            std::collections::btree_map::Entry::Occupied(_) => {
                Err(Error::InvalidMessage(format!("index {} was already added", index)))
            }
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(message);
                Ok(())
            }
        }
    }
}

pub(crate) trait NonceSink {
    fn set_nonce(&mut self, nonce: ProofNonce);
}

pub(crate) fn open_context<T: Default>(
    map: &ConcurrentHandleMap<T>,
    name: &str,
    err: &mut ExternError,
) -> u64 {
    let handle = map.insert_with_output(err, T::default);
    if status(err) == error::codes::SUCCESS {
        debug!("{} context {:#x} opened", name, handle);
    }
    handle
}

/// Looks the context up, then parses the input and stores it
pub(crate) fn set_field<T, V, P, A>(
    map: &ConcurrentHandleMap<T>,
    handle: u64,
    err: &mut ExternError,
    parse: P,
    apply: A,
) -> i32
where
    P: UnwindSafe + FnOnce() -> Result<V, Error>,
    A: UnwindSafe + FnOnce(&mut T, V) -> Result<(), Error>,
{
    map.call_with_result_mut(err, handle, move |ctx| -> Result<(), Error> {
        let value = parse()?;
        apply(ctx, value)?;
        trace!("context {:#x} updated", handle);
        Ok(())
    });
    status(err)
}

pub(crate) fn add_message<T: MessageSink>(
    map: &ConcurrentHandleMap<T>,
    handle: u64,
    message: MessageInput<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(map, handle, err, || message.to_message(), |ctx, m| {
        ctx.push_message(m);
        Ok(())
    })
}

pub(crate) fn add_indexed_message<T: IndexedMessageSink>(
    map: &ConcurrentHandleMap<T>,
    handle: u64,
    index: u32,
    message: MessageInput<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(map, handle, err, || message.to_message(), |ctx, m| {
        ctx.insert_message(index as usize, m)
    })
}

pub(crate) fn set_nonce<T: NonceSink>(
    map: &ConcurrentHandleMap<T>,
    handle: u64,
    nonce: MessageInput<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(map, handle, err, || nonce.to_nonce(), |ctx, n| {
        ctx.set_nonce(n);
        Ok(())
    })
}

/// Retires the handle, then runs the computation on its content
pub(crate) fn finish_context<T, R, F>(
    map: &ConcurrentHandleMap<T>,
    handle: u64,
    name: &str,
    err: &mut ExternError,
    compute: F,
) -> R
where
    R: Default,
    F: FnOnce(T) -> Result<R, Error>,
{
    let mut output = None;
    call_with_result(
        err,
        AssertUnwindSafe(|| -> Result<(), ExternError> {
            let ctx = map.remove_u64(handle)?.ok_or(Error::PoisonedContext)?;
            debug!("{} context {:#x} finished", name, handle);
            output = Some(compute(ctx)?);
            Ok(())
        }),
    );
    output.unwrap_or_default()
}

pub(crate) fn free_context<T>(
    map: &ConcurrentHandleMap<T>,
    handle: u64,
    name: &str,
    err: &mut ExternError,
) -> i32 {
    call_with_result(err, || -> Result<(), ExternError> {
        map.delete_u64(handle)?;
        debug!("{} context {:#x} freed", name, handle);
        Ok(())
    });
    status(err)
}
