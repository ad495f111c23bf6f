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

use std::collections::{BTreeMap, BTreeSet};

use bls12_381_plus::{G1Projective, Scalar};
use elliptic_curve::hash2curve::ExpandMsg;
use serde::{Deserialize, Serialize};

use super::ciphersuites::BbsCiphersuite;
use super::keys::BBSplusSchemeKey;
use super::message::{BBSplusMessage, ProofNonce};
use crate::errors::Error;
use crate::utils::util::{
    calculate_random_scalars, g1_to_bytes, hash_to_scalar, i2osp, scalars_from_bytes, ByteReader,
    ScalarExt, G1_LEN, SCALAR_LEN,
};

/// Secret scalar that hides a commitment or a blinded public key
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BlindFactor(pub(crate) Scalar);

impl BlindFactor {
    pub const LENGTH: usize = SCALAR_LEN;

    pub fn random() -> Self {
        Self(calculate_random_scalars(1)[0])
    }

    pub fn to_bytes(&self) -> [u8; SCALAR_LEN] {
        self.0.to_bytes_be()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(Scalar::from_bytes_be(bytes)?))
    }
}

/// Commitment to the hidden messages together with a proof of its opening.
///
/// This is everything the signer needs to complete a blind signature.
/// Serialized as `C || challenge || s_cap || m_cap_1 || ... || m_cap_k`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BlindSignatureContext {
    pub commitment: G1Projective,
    pub challenge: Scalar,
    pub s_cap: Scalar,
    pub m_cap: Vec<Scalar>,
}

impl BlindSignatureContext {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(G1_LEN + SCALAR_LEN * (2 + self.m_cap.len()));
        bytes.extend_from_slice(&g1_to_bytes(&self.commitment));
        bytes.extend_from_slice(&self.challenge.to_bytes_be());
        bytes.extend_from_slice(&self.s_cap.to_bytes_be());
        self.m_cap
            .iter()
            .for_each(|m| bytes.extend_from_slice(&m.to_bytes_be()));
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = ByteReader::new(bytes);
        let commitment = reader.g1().map_err(|_| Error::InvalidCommitment)?;
        let challenge = reader.scalar().map_err(|_| Error::InvalidCommitmentProof)?;
        let s_cap = reader.scalar().map_err(|_| Error::InvalidCommitmentProof)?;
        let m_cap = scalars_from_bytes(reader.rest()).map_err(|_| Error::InvalidCommitmentProof)?;

        Ok(Self {
            commitment,
            challenge,
            s_cap,
            m_cap,
        })
    }

    /// # Description
    /// Commits to the messages at the chosen indices and proves knowledge of the opening.
    ///
    /// # Inputs:
    /// * `messages` (REQUIRED), the hidden messages keyed by their position in the final signature.
    /// * `nonce` (REQUIRED), the signer supplied nonce the proof is bound to.
    /// * `pk` (REQUIRED), the scheme key of the signer.
    ///
    /// # Output:
    /// ([`BlindSignatureContext`], [`BlindFactor`]), the context for the signer and `s'`, which the
    /// holder keeps to unblind the signature.
    pub fn commit<CS>(
        messages: &BTreeMap<usize, BBSplusMessage>,
        nonce: &ProofNonce,
        pk: &BBSplusSchemeKey,
    ) -> Result<(Self, BlindFactor), Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let gens = committed_generators(pk, messages.keys())?;
        let M = messages.len();

        let random_scalars = calculate_random_scalars(M + 2);
        let secret_prover_blind = random_scalars[0];
        let s_tilde = random_scalars[1];
        let m_tilde = &random_scalars[2..];

        let mut commitment = pk.h0() * secret_prover_blind;
        let mut Cbar = pk.h0() * s_tilde;
        for ((h_i, m_i), m_tilde_i) in gens.iter().zip(messages.values()).zip(m_tilde) {
            commitment += h_i * m_i.value;
            Cbar += h_i * m_tilde_i;
        }

        let challenge = calculate_blind_challenge::<CS>(&commitment, &Cbar, pk.h0(), &gens, nonce)?;

        let s_cap = s_tilde + secret_prover_blind * challenge;
        let m_cap = messages
            .values()
            .zip(m_tilde)
            .map(|(m, m_tilde_i)| m_tilde_i + m.value * challenge)
            .collect();

        Ok((
            Self {
                commitment,
                challenge,
                s_cap,
                m_cap,
            },
            BlindFactor(secret_prover_blind),
        ))
    }

    /// # Description
    /// Checks the proof of opening against the indices the signer expects to be hidden.
    ///
    /// # Output:
    /// `Ok(false)` if the proof does not match, [`Error`] if an index does not fit the key.
    pub fn verify<CS>(
        &self,
        blinded: &BTreeSet<usize>,
        nonce: &ProofNonce,
        pk: &BBSplusSchemeKey,
    ) -> Result<bool, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let gens = committed_generators(pk, blinded.iter())?;
        if gens.len() != self.m_cap.len() {
            return Ok(false);
        }

        let mut Cbar = pk.h0() * self.s_cap;
        for (h_i, m_cap_i) in gens.iter().zip(&self.m_cap) {
            Cbar += h_i * m_cap_i;
        }
        Cbar += self.commitment * (-self.challenge);

        let cv = calculate_blind_challenge::<CS>(&self.commitment, &Cbar, pk.h0(), &gens, nonce)?;

        Ok(cv == self.challenge)
    }
}

fn committed_generators<'a>(
    pk: &BBSplusSchemeKey,
    indices: impl Iterator<Item = &'a usize>,
) -> Result<Vec<G1Projective>, Error> {
    let L = pk.message_count();
    indices
        .map(|&i| {
            pk.h()
                .get(i)
                .copied()
                .ok_or(Error::InvalidMessageIndex {
                    index: i,
                    message_count: L,
                })
        })
        .collect()
}

/// `C || Cbar || M || h0 || h_1..h_M || len(nonce) || nonce`
fn calculate_blind_challenge<CS>(
    commitment: &G1Projective,
    Cbar: &G1Projective,
    h0: G1Projective,
    gens: &[G1Projective],
    nonce: &ProofNonce,
) -> Result<Scalar, Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    let nonce = nonce.to_bytes();

    let mut input: Vec<u8> = Vec::new();
    input.extend_from_slice(&g1_to_bytes(commitment));
    input.extend_from_slice(&g1_to_bytes(Cbar));
    input.extend_from_slice(&i2osp(gens.len(), 8));
    input.extend_from_slice(&g1_to_bytes(&h0));
    gens.iter()
        .for_each(|g| input.extend_from_slice(&g1_to_bytes(g)));
    input.extend_from_slice(&i2osp(nonce.len(), 8));
    input.extend_from_slice(&nonce);

    hash_to_scalar::<CS>(&input, &CS::commitment_challenge_dst())
        .map_err(|_| Error::ChallengeComputationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff::Field;

    use crate::bbsplus::ciphersuites::Bls12381Sha256;
    use crate::keys::pair::KeyPair;
    use crate::schemes::algorithms::BbsBls12381Sha256;

    fn setup() -> (BBSplusSchemeKey, BTreeMap<usize, BBSplusMessage>, ProofNonce) {
        let kp = KeyPair::<BbsBls12381Sha256>::from_seed(Some(b"commitment tests")).unwrap();
        let pk = BBSplusSchemeKey::from_public_key::<Bls12381Sha256>(kp.public_key(), 5).unwrap();
        let mut messages = BTreeMap::new();
        messages.insert(0, BBSplusMessage::hash::<Bls12381Sha256>(b"secret 0").unwrap());
        messages.insert(3, BBSplusMessage::hash::<Bls12381Sha256>(b"secret 3").unwrap());
        let nonce = ProofNonce::hash::<Bls12381Sha256>(b"nonce").unwrap();
        (pk, messages, nonce)
    }

    #[test]
    fn commitment_verifies_for_the_same_indices() {
        let (pk, messages, nonce) = setup();
        let (ctx, _) = BlindSignatureContext::commit::<Bls12381Sha256>(&messages, &nonce, &pk).unwrap();

        let blinded: BTreeSet<usize> = [0, 3].into_iter().collect();
        assert!(ctx.verify::<Bls12381Sha256>(&blinded, &nonce, &pk).unwrap());

        let wrong: BTreeSet<usize> = [0, 2].into_iter().collect();
        assert!(!ctx.verify::<Bls12381Sha256>(&wrong, &nonce, &pk).unwrap());

        let other_nonce = ProofNonce::hash::<Bls12381Sha256>(b"other").unwrap();
        assert!(!ctx.verify::<Bls12381Sha256>(&blinded, &other_nonce, &pk).unwrap());
    }

    #[test]
    fn tampered_opening_proof_fails() {
        let (pk, messages, nonce) = setup();
        let (ctx, _) = BlindSignatureContext::commit::<Bls12381Sha256>(&messages, &nonce, &pk).unwrap();
        let blinded: BTreeSet<usize> = messages.keys().copied().collect();

        let changes: [fn(&mut BlindSignatureContext); 5] = [
            |c| c.commitment += G1Projective::GENERATOR,
            |c| c.challenge += Scalar::ONE,
            |c| c.s_cap += Scalar::ONE,
            |c| c.m_cap[0] += Scalar::ONE,
            |c| c.m_cap[1] += Scalar::ONE,
        ];
        for change in changes {
            let mut altered = ctx.clone();
            change(&mut altered);
            assert!(!altered.verify::<Bls12381Sha256>(&blinded, &nonce, &pk).unwrap());
        }

        let mut short = ctx.clone();
        short.m_cap.pop();
        assert!(!short.verify::<Bls12381Sha256>(&blinded, &nonce, &pk).unwrap());
    }

    #[test]
    fn context_bytes() {
        let (pk, messages, nonce) = setup();
        let (ctx, bf) = BlindSignatureContext::commit::<Bls12381Sha256>(&messages, &nonce, &pk).unwrap();
        let bytes = ctx.to_bytes();
        assert_eq!(bytes.len(), 48 + 32 * 4);
        assert_eq!(BlindSignatureContext::from_bytes(&bytes).unwrap(), ctx);
        assert_eq!(BlindFactor::from_bytes(&bf.to_bytes()).unwrap(), bf);
        assert!(BlindSignatureContext::from_bytes(&bytes[..50]).is_err());
    }

    #[test]
    fn index_outside_the_key() {
        let (pk, mut messages, nonce) = setup();
        messages.insert(5, BBSplusMessage::hash::<Bls12381Sha256>(b"too far").unwrap());
        let err = BlindSignatureContext::commit::<Bls12381Sha256>(&messages, &nonce, &pk).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidMessageIndex {
                index: 5,
                message_count: 5
            }
        );
    }
}
