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

use bls12_381_plus::{G1Projective, Scalar};
use serde::{Deserialize, Serialize};

use super::commitment::BlindFactor;
use super::keys::{BBSplusSchemeKey, BBSplusSecretKey};
use super::message::BBSplusMessage;
use super::signature::BBSplusSignature;
use crate::errors::Error;
use crate::utils::util::calculate_random_scalars;

/// Signature over a commitment, `s` still misses the holder's `s'`
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BBSplusBlindSignature {
    pub a: G1Projective,
    pub e: Scalar,
    pub s_prime: Scalar,
}

impl BBSplusBlindSignature {
    pub const SIGNATURE_LENGTH: usize = BBSplusSignature::SIGNATURE_LENGTH;

    pub fn to_bytes(&self) -> [u8; Self::SIGNATURE_LENGTH] {
        BBSplusSignature {
            a: self.a,
            e: self.e,
            s: self.s_prime,
        }
        .to_bytes()
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let inner = BBSplusSignature::from_bytes(data)?;
        Ok(Self {
            a: inner.a,
            e: inner.e,
            s_prime: inner.s,
        })
    }

    /// # Description
    /// Completes a signature over a commitment to the hidden messages and the known messages.
    ///
    /// # Inputs:
    /// * `commitment` (REQUIRED), the holder commitment `h0 * s' + sum(h_i * m_i)`.
    /// * `messages` (REQUIRED), the known messages keyed by their index.
    /// * `sk` (REQUIRED), the signer secret key.
    /// * `pk` (REQUIRED), the scheme key of the signer.
    ///
    /// # Output:
    /// [`BBSplusBlindSignature`] or [`Error`].
    pub fn blind_sign(
        commitment: &G1Projective,
        messages: &BTreeMap<usize, BBSplusMessage>,
        sk: &BBSplusSecretKey,
        pk: &BBSplusSchemeKey,
    ) -> Result<Self, Error> {
        let L = pk.message_count();
        if messages.len() > L {
            return Err(Error::MessageCountMismatch {
                expected: L,
                found: messages.len(),
            });
        }

        let random_scalars = calculate_random_scalars(2);
        let e = random_scalars[0];
        let s_prime = random_scalars[1];

        // B = P1 + C + h0 * s'' + sum(h_i * m_i) over the known messages
        let mut B = pk.generators.g1_base_point + commitment + pk.h0() * s_prime;
        for (i, m) in messages {
            let h_i = pk.h().get(*i).ok_or(Error::InvalidMessageIndex {
                index: *i,
                message_count: L,
            })?;
            B += h_i * m.value;
        }

        let A = B * Option::<Scalar>::from((sk.0 + e).invert())
            .ok_or_else(|| Error::BlindSignError("SK + e == 0".to_owned()))?;

        if A == G1Projective::IDENTITY {
            return Err(Error::G1IdentityError);
        }

        Ok(Self { a: A, e, s_prime })
    }

    /// s = s'' + s'
    pub fn to_unblinded(&self, blinding: &BlindFactor) -> BBSplusSignature {
        BBSplusSignature {
            a: self.a,
            e: self.e,
            s: self.s_prime + blinding.0,
        }
    }
}
