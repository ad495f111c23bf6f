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

use bls12_381_plus::{multi_miller_loop, G1Projective, G2Prepared, G2Projective, Gt, Scalar};
use elliptic_curve::group::Curve;
use serde::{Deserialize, Serialize};

use super::keys::{BBSplusSchemeKey, BBSplusSecretKey};
use super::message::BBSplusMessage;
use crate::errors::Error;
use crate::utils::util::{calculate_random_scalars, g1_to_bytes, ByteReader, ScalarExt};

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BBSplusSignature {
    pub a: G1Projective,
    pub e: Scalar,
    pub s: Scalar,
}

impl BBSplusSignature {
    pub const SIGNATURE_LENGTH: usize = 112;

    pub fn to_bytes(&self) -> [u8; Self::SIGNATURE_LENGTH] {
        let mut bytes = [0u8; Self::SIGNATURE_LENGTH];
        bytes[0..48].copy_from_slice(&g1_to_bytes(&self.a));
        bytes[48..80].copy_from_slice(&self.e.to_bytes_be());
        bytes[80..112].copy_from_slice(&self.s.to_bytes_be());
        bytes
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() != Self::SIGNATURE_LENGTH {
            return Err(Error::DeserializationError(format!(
                "signature must be {} bytes",
                Self::SIGNATURE_LENGTH
            )));
        }
        let mut reader = ByteReader::new(data);
        let a = reader.g1()?;
        let e = reader.scalar()?;
        let s = reader.scalar()?;
        Ok(Self { a, e, s })
    }

    /// # Description
    /// Signs an ordered list of messages. The key must carry exactly one generator per message.
    ///
    /// # Inputs:
    /// * `messages` (REQUIRED), the messages, already mapped to scalars.
    /// * `sk` (REQUIRED), the signer secret key.
    /// * `pk` (REQUIRED), the scheme key of the signer.
    ///
    /// # Output:
    /// [`BBSplusSignature`] or [`Error`].
    pub fn sign(
        messages: &[BBSplusMessage],
        sk: &BBSplusSecretKey,
        pk: &BBSplusSchemeKey,
    ) -> Result<Self, Error> {
        let L = messages.len();
        if pk.message_count() != L {
            return Err(Error::MessageCountMismatch {
                expected: pk.message_count(),
                found: L,
            });
        }

        let random_scalars = calculate_random_scalars(2);
        let e = random_scalars[0];
        let s = random_scalars[1];

        // B = P1 + h0 * s + h_1 * msg_1 + ... + h_L * msg_L
        let mut B = pk.generators.g1_base_point + pk.h0() * s;
        for (h_i, m_i) in pk.h().iter().zip(messages) {
            B += h_i * m_i.value;
        }

        // A = B * (1 / (SK + e))
        let A = B * Option::<Scalar>::from((sk.0 + e).invert())
            .ok_or_else(|| Error::SignatureGenerationError("SK + e == 0".to_owned()))?;

        if A == G1Projective::IDENTITY {
            return Err(Error::G1IdentityError);
        }

        Ok(Self { a: A, e, s })
    }

    /// Returns `Ok(false)` for a well formed but invalid signature
    pub fn verify(&self, pk: &BBSplusSchemeKey, messages: &[BBSplusMessage]) -> Result<bool, Error> {
        let L = messages.len();
        if pk.message_count() != L {
            return Err(Error::MessageCountMismatch {
                expected: pk.message_count(),
                found: L,
            });
        }

        let mut B = pk.generators.g1_base_point + pk.h0() * self.s;
        for (h_i, m_i) in pk.h().iter().zip(messages) {
            B += h_i * m_i.value;
        }

        Ok(pairing_check(&self.a, &B, &pk.w.0, &self.e))
    }
}

/// e(A, W + P2 * e) * e(B, -P2) == 1
pub(crate) fn pairing_check(A: &G1Projective, B: &G1Projective, w: &G2Projective, e: &Scalar) -> bool {
    if *A == G1Projective::IDENTITY {
        return false;
    }

    let BP2 = G2Projective::GENERATOR;
    let A2 = w + BP2 * e;

    let term1 = (&A.to_affine(), &G2Prepared::from(A2.to_affine()));
    let term2 = (&B.to_affine(), &G2Prepared::from(-BP2.to_affine()));

    multi_miller_loop(&[term1, term2]).final_exponentiation() == Gt::IDENTITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbsplus::ciphersuites::Bls12381Sha256;
    use crate::keys::pair::KeyPair;
    use crate::schemes::algorithms::BbsBls12381Sha256;

    fn messages(texts: &[&str]) -> Vec<BBSplusMessage> {
        texts
            .iter()
            .map(|m| BBSplusMessage::hash::<Bls12381Sha256>(m.as_bytes()).unwrap())
            .collect()
    }

    fn setup(count: usize) -> (BBSplusSecretKey, BBSplusSchemeKey) {
        let kp = KeyPair::<BbsBls12381Sha256>::from_seed(Some(b"signature tests")).unwrap();
        let pk = BBSplusSchemeKey::from_public_key::<Bls12381Sha256>(kp.public_key(), count).unwrap();
        (kp.private_key().clone(), pk)
    }

    #[test]
    fn sign_and_verify() {
        let (sk, pk) = setup(3);
        let msgs = messages(&["a", "b", "c"]);
        let signature = BBSplusSignature::sign(&msgs, &sk, &pk).unwrap();
        assert!(signature.verify(&pk, &msgs).unwrap());

        let tampered = messages(&["a", "x", "c"]);
        assert!(!signature.verify(&pk, &tampered).unwrap());

        let reordered = messages(&["b", "a", "c"]);
        assert!(!signature.verify(&pk, &reordered).unwrap());
    }

    #[test]
    fn message_count_must_match_key() {
        let (sk, pk) = setup(3);
        let msgs = messages(&["a", "b"]);
        assert_eq!(
            BBSplusSignature::sign(&msgs, &sk, &pk).unwrap_err(),
            Error::MessageCountMismatch { expected: 3, found: 2 }
        );
    }

    #[test]
    fn signature_bytes() {
        let (sk, pk) = setup(1);
        let msgs = messages(&["only"]);
        let signature = BBSplusSignature::sign(&msgs, &sk, &pk).unwrap();
        let bytes = signature.to_bytes();
        assert_eq!(bytes.len(), 112);
        assert_eq!(BBSplusSignature::from_bytes(&bytes).unwrap(), signature);
        assert!(BBSplusSignature::from_bytes(&bytes[..111]).is_err());
    }
}
