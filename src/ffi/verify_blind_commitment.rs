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

use std::collections::BTreeSet;

use super::buffer::{ByteArray, FfiStr};
use super::error::ExternError;
use super::{engine, finish_context, free_context, open_context, set_field, set_nonce, MessageInput, NonceSink, Suite};
use crate::bbsplus::commitment::BlindSignatureContext;
use crate::bbsplus::keys::BBSplusSchemeKey;
use crate::bbsplus::message::ProofNonce;
use crate::bbsplus::proof::ProofStatus;
use crate::errors::Error;

#[derive(Default)]
pub struct VerifyBlindCommitmentContext {
    blinded: BTreeSet<usize>,
    nonce: Option<ProofNonce>,
    proof: Option<BlindSignatureContext>,
    public_key: Option<BBSplusSchemeKey>,
}

impl NonceSink for VerifyBlindCommitmentContext {
    fn set_nonce(&mut self, nonce: ProofNonce) {
        self.nonce = Some(nonce);
    }
}

impl VerifyBlindCommitmentContext {
    fn verify(self) -> Result<i32, Error> {
        if self.blinded.is_empty() {
            return Err(Error::EmptyInput("Blinded indices"));
        }
        let nonce = self.nonce.ok_or(Error::MissingInput("Nonce"))?;
        let proof = self.proof.ok_or(Error::MissingInput("Proof"))?;
        let pk = self.public_key.ok_or(Error::MissingInput("Public Key"))?;

        let status = if proof.verify::<Suite>(&self.blinded, &nonce, &pk)? {
            ProofStatus::Success
        } else {
            ProofStatus::BadHiddenMessage
        };
        Ok(status.code())
    }
}

#[no_mangle]
pub extern "C" fn bbs_verify_blind_commitment_context_init(err: &mut ExternError) -> u64 {
    open_context(&engine().verify_blind_commitment, "verify blind commitment", err)
}

/// Declares `index` as one of the positions hidden in the commitment
#[no_mangle]
pub extern "C" fn bbs_verify_blind_commitment_context_add_blinded(
    handle: u64,
    index: u32,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().verify_blind_commitment,
        handle,
        err,
        || Ok(index as usize),
        |ctx, index| {
            ctx.blinded.insert(index);
            Ok(())
        },
    )
}

#[no_mangle]
pub extern "C" fn bbs_verify_blind_commitment_context_set_public_key(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().verify_blind_commitment,
        handle,
        err,
        || BBSplusSchemeKey::from_bytes(value.required("Public Key")?),
        |ctx, pk| {
            ctx.public_key = Some(pk);
            Ok(())
        },
    )
}

/// Takes the signer context produced by `bbs_blind_commitment_context_finish`
#[no_mangle]
pub extern "C" fn bbs_verify_blind_commitment_context_set_proof(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_field(
        &engine().verify_blind_commitment,
        handle,
        err,
        || BlindSignatureContext::from_bytes(value.required("Proof")?),
        |ctx, proof| {
            ctx.proof = Some(proof);
            Ok(())
        },
    )
}

#[no_mangle]
pub extern "C" fn bbs_verify_blind_commitment_context_set_nonce_string(
    handle: u64,
    value: FfiStr<'_>,
    err: &mut ExternError,
) -> i32 {
    set_nonce(&engine().verify_blind_commitment, handle, MessageInput::Str(value), err)
}

#[no_mangle]
pub extern "C" fn bbs_verify_blind_commitment_context_set_nonce_bytes(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_nonce(&engine().verify_blind_commitment, handle, MessageInput::Bytes(value), err)
}

#[no_mangle]
pub extern "C" fn bbs_verify_blind_commitment_context_set_nonce_prehashed(
    handle: u64,
    value: ByteArray<'_>,
    err: &mut ExternError,
) -> i32 {
    set_nonce(
        &engine().verify_blind_commitment,
        handle,
        MessageInput::Prehashed(value),
        err,
    )
}

/// Returns 200 when the proof of opening holds and 401 otherwise
#[no_mangle]
pub extern "C" fn bbs_verify_blind_commitment_context_finish(handle: u64, err: &mut ExternError) -> i32 {
    finish_context(
        &engine().verify_blind_commitment,
        handle,
        "verify blind commitment",
        err,
        VerifyBlindCommitmentContext::verify,
    )
}

#[no_mangle]
pub extern "C" fn free_bbs_verify_blind_commitment(handle: u64, err: &mut ExternError) -> i32 {
    free_context(
        &engine().verify_blind_commitment,
        handle,
        "verify blind commitment",
        err,
    )
}
