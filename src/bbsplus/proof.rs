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

use bls12_381_plus::{multi_miller_loop, G1Projective, G2Prepared, G2Projective, Gt, Scalar};
use elliptic_curve::group::Curve;
use elliptic_curve::hash2curve::ExpandMsg;
use serde::{Deserialize, Serialize};

use super::ciphersuites::BbsCiphersuite;
use super::keys::BBSplusSchemeKey;
use super::message::{BBSplusMessage, ProofNonce};
use super::signature::BBSplusSignature;
use crate::errors::Error;
use crate::utils::util::{
    calculate_random_scalars, g1_to_bytes, hash_to_scalar, i2osp, scalars_from_bytes, ByteReader,
    ScalarExt, G1_LEN, SCALAR_LEN,
};

/// A hidden message and the way its Schnorr blinding is chosen
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum HiddenMessage {
    /// Fresh blinding for every proof
    ProofSpecificBlinding(BBSplusMessage),
    /// Blinding supplied by the caller, so that two proofs over the same message can be linked
    ExternalBlinding(BBSplusMessage, Scalar),
}

impl HiddenMessage {
    pub fn message(&self) -> &BBSplusMessage {
        match self {
            HiddenMessage::ProofSpecificBlinding(m) => m,
            HiddenMessage::ExternalBlinding(m, _) => m,
        }
    }

    /// Maps an external blinding factor to the scalar used as Schnorr blinding
    pub fn external_blinding<CS>(blinding_factor: &[u8]) -> Result<Scalar, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        if blinding_factor.is_empty() {
            return Err(Error::EmptyInput("Blinding Factor"));
        }
        hash_to_scalar::<CS>(blinding_factor, &CS::external_blinding_dst())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ProofMessage {
    Revealed(BBSplusMessage),
    Hidden(HiddenMessage),
}

impl ProofMessage {
    pub fn message(&self) -> &BBSplusMessage {
        match self {
            ProofMessage::Revealed(m) => m,
            ProofMessage::Hidden(h) => h.message(),
        }
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self, ProofMessage::Revealed(_))
    }
}

/// Outcome of a proof verification
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[repr(i32)]
pub enum ProofStatus {
    Success = 200,
    /// The randomized signature does not satisfy the pairing equation
    BadSignature = 400,
    /// The proof of knowledge of the hidden values does not hold
    BadHiddenMessage = 401,
    /// The revealed messages do not match the signed ones
    BadRevealedMessage = 402,
}

impl ProofStatus {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// Proof of knowledge of a signature, without the disclosure header.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PoKOfSignatureProof {
    A_prime: G1Projective,
    A_bar: G1Projective,
    d: G1Projective,
    T1: G1Projective,
    z_e: Scalar,
    z_r2: Scalar,
    T2: G1Projective,
    z_r3: Scalar,
    z_s: Scalar,
    z_m: Vec<Scalar>,
}

impl PoKOfSignatureProof {
    pub const FIXED_LENGTH: usize = 5 * G1_LEN + 4 * SCALAR_LEN;

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::FIXED_LENGTH + SCALAR_LEN * self.z_m.len());
        bytes.extend_from_slice(&g1_to_bytes(&self.A_prime));
        bytes.extend_from_slice(&g1_to_bytes(&self.A_bar));
        bytes.extend_from_slice(&g1_to_bytes(&self.d));
        bytes.extend_from_slice(&g1_to_bytes(&self.T1));
        bytes.extend_from_slice(&self.z_e.to_bytes_be());
        bytes.extend_from_slice(&self.z_r2.to_bytes_be());
        bytes.extend_from_slice(&g1_to_bytes(&self.T2));
        bytes.extend_from_slice(&self.z_r3.to_bytes_be());
        bytes.extend_from_slice(&self.z_s.to_bytes_be());
        self.z_m
            .iter()
            .for_each(|v| bytes.extend_from_slice(&v.to_bytes_be()));
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let invalid = |_: Error| Error::InvalidProofOfKnowledgeSignature;
        let mut reader = ByteReader::new(bytes);
        let A_prime = reader.g1().map_err(invalid)?;
        let A_bar = reader.g1().map_err(invalid)?;
        let d = reader.g1().map_err(invalid)?;
        let T1 = reader.g1().map_err(invalid)?;
        let z_e = reader.scalar().map_err(invalid)?;
        let z_r2 = reader.scalar().map_err(invalid)?;
        let T2 = reader.g1().map_err(invalid)?;
        let z_r3 = reader.scalar().map_err(invalid)?;
        let z_s = reader.scalar().map_err(invalid)?;
        let z_m = scalars_from_bytes(reader.rest()).map_err(invalid)?;

        Ok(Self {
            A_prime,
            A_bar,
            d,
            T1,
            z_e,
            z_r2,
            T2,
            z_r3,
            z_s,
            z_m,
        })
    }
}

/// Selective disclosure proof as exchanged between holder and verifier.
///
/// Serialized as `I2OSP(L, 2) || revealed bitvector || proof`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BBSplusPoKSignature {
    pub message_count: usize,
    pub revealed: BTreeSet<usize>,
    pub proof: PoKOfSignatureProof,
}

impl BBSplusPoKSignature {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = (self.message_count as u16).to_be_bytes().to_vec();
        bytes.extend_from_slice(&revealed_to_bitvector(self.message_count, &self.revealed));
        bytes.extend_from_slice(&self.proof.to_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let message_count = Self::total_message_count(bytes)?;
        let mut reader = ByteReader::new(&bytes[2..]);
        let bitvector = reader
            .take(bitvector_length(message_count))
            .map_err(|_| Error::InvalidProofOfKnowledgeSignature)?;
        let revealed = bitvector_to_revealed(bitvector);
        if revealed.iter().any(|i| *i >= message_count) {
            return Err(Error::InvalidProofOfKnowledgeSignature);
        }
        let proof = PoKOfSignatureProof::from_bytes(reader.rest())?;
        if proof.z_m.len() != message_count - revealed.len() {
            return Err(Error::InvalidProofOfKnowledgeSignature);
        }

        Ok(Self {
            message_count,
            revealed,
            proof,
        })
    }

    /// Reads the message count prefix of a serialized proof
    pub fn total_message_count(bytes: &[u8]) -> Result<usize, Error> {
        let prefix: [u8; 2] = bytes
            .get(0..2)
            .and_then(|b| b.try_into().ok())
            .ok_or(Error::InvalidProofOfKnowledgeSignature)?;
        Ok(u16::from_be_bytes(prefix) as usize)
    }

    /// Length of the serialized proof for `message_count` messages, `hidden_count` of them hidden
    pub fn serialized_length(message_count: usize, hidden_count: usize) -> usize {
        2 + bitvector_length(message_count) + PoKOfSignatureProof::FIXED_LENGTH + SCALAR_LEN * hidden_count
    }

    /// # Description
    /// Creates a proof of knowledge of `signature` that discloses the revealed messages only.
    ///
    /// # Inputs:
    /// * `signature` (REQUIRED), a valid signature over all the messages.
    /// * `pk` (REQUIRED), the scheme key of the signer.
    /// * `messages` (REQUIRED), every signed message in signing order, each tagged as revealed or hidden.
    /// * `nonce` (REQUIRED), the verifier nonce.
    ///
    /// # Output:
    /// [`BBSplusPoKSignature`] or [`Error`].
    pub fn proof_gen<CS>(
        signature: &BBSplusSignature,
        pk: &BBSplusSchemeKey,
        messages: &[ProofMessage],
        nonce: &ProofNonce,
    ) -> Result<Self, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let L = messages.len();
        if L == 0 {
            return Err(Error::ProofGenError("no messages".to_owned()));
        }
        if L > u16::MAX as usize {
            return Err(Error::ProofGenError("too many messages".to_owned()));
        }
        if pk.message_count() != L {
            return Err(Error::MessageCountMismatch {
                expected: pk.message_count(),
                found: L,
            });
        }

        let hidden: Vec<(usize, &HiddenMessage)> = messages
            .iter()
            .enumerate()
            .filter_map(|(i, m)| match m {
                ProofMessage::Hidden(h) => Some((i, h)),
                ProofMessage::Revealed(_) => None,
            })
            .collect();

        let random_scalars = calculate_random_scalars(6 + hidden.len());
        let r1 = random_scalars[0];
        let r2 = random_scalars[1];
        let e_tilde = random_scalars[2];
        let r2_tilde = random_scalars[3];
        let r3_tilde = random_scalars[4];
        let s_tilde = random_scalars[5];
        let m_tilde: Vec<Scalar> = hidden
            .iter()
            .zip(&random_scalars[6..])
            .map(|((_, h), fresh)| match h {
                HiddenMessage::ProofSpecificBlinding(_) => *fresh,
                HiddenMessage::ExternalBlinding(_, blinding) => *blinding,
            })
            .collect();

        let r3 = Option::<Scalar>::from(r1.invert())
            .ok_or_else(|| Error::ProofGenError("r1 == 0".to_owned()))?;

        // b = P1 + h0 * s + sum(h_i * m_i)
        let mut b = pk.generators.g1_base_point + pk.h0() * signature.s;
        for (h_i, m_i) in pk.h().iter().zip(messages) {
            b += h_i * m_i.message().value;
        }

        let A_prime = signature.a * r1;
        let A_bar = A_prime * (-signature.e) + b * r1;
        let d = b * r1 - pk.h0() * r2;
        let s_prime = signature.s - r2 * r3;

        // A_bar - d = A' * (-e) + h0 * r2
        let T1 = A_prime * e_tilde + pk.h0() * r2_tilde;

        // P1 + sum_revealed(h_i * m_i) = d * r3 - h0 * s' - sum_hidden(h_j * m_j)
        let mut T2 = d * r3_tilde + pk.h0() * s_tilde;
        for ((j, _), m_tilde_j) in hidden.iter().zip(&m_tilde) {
            T2 += pk.h()[*j] * m_tilde_j;
        }

        let revealed: BTreeSet<usize> = messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_revealed())
            .map(|(i, _)| i)
            .collect();
        let domain = calculate_domain::<CS>(pk)?;
        let c = calculate_challenge::<CS>(&A_prime, &A_bar, &d, &T1, &T2, &revealed, &domain, nonce)?;

        let z_e = e_tilde - c * signature.e;
        let z_r2 = r2_tilde + c * r2;
        let z_r3 = r3_tilde + c * r3;
        let z_s = s_tilde - c * s_prime;
        let z_m = hidden
            .iter()
            .zip(&m_tilde)
            .map(|((_, h), m_tilde_j)| m_tilde_j - c * h.message().value)
            .collect();

        Ok(Self {
            message_count: L,
            revealed,
            proof: PoKOfSignatureProof {
                A_prime,
                A_bar,
                d,
                T1,
                z_e,
                z_r2,
                T2,
                z_r3,
                z_s,
                z_m,
            },
        })
    }

    /// # Description
    /// Verifies the proof against the revealed messages, given in ascending index order.
    ///
    /// # Output:
    /// the [`ProofStatus`] of the verification, or [`Error`] when the inputs do not fit the proof.
    pub fn proof_verify<CS>(
        &self,
        pk: &BBSplusSchemeKey,
        revealed_messages: &[BBSplusMessage],
        nonce: &ProofNonce,
    ) -> Result<ProofStatus, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        if revealed_messages.len() != self.revealed.len() {
            return Err(Error::RevealedMismatch(format!(
                "expected {} revealed messages, found {}",
                self.revealed.len(),
                revealed_messages.len()
            )));
        }
        if pk.message_count() != self.message_count {
            return Err(Error::MessageCountMismatch {
                expected: pk.message_count(),
                found: self.message_count,
            });
        }

        let proof = &self.proof;
        let hidden_indices: Vec<usize> = (0..self.message_count)
            .filter(|i| !self.revealed.contains(i))
            .collect();
        if hidden_indices.len() != proof.z_m.len() {
            return Err(Error::InvalidProofOfKnowledgeSignature);
        }

        if proof.A_prime == G1Projective::IDENTITY {
            return Ok(ProofStatus::BadSignature);
        }
        let term1 = (&proof.A_prime.to_affine(), &G2Prepared::from(pk.w.0.to_affine()));
        let term2 = (
            &proof.A_bar.to_affine(),
            &G2Prepared::from(-G2Projective::GENERATOR.to_affine()),
        );
        if multi_miller_loop(&[term1, term2]).final_exponentiation() != Gt::IDENTITY {
            return Ok(ProofStatus::BadSignature);
        }

        let domain = calculate_domain::<CS>(pk)?;
        let c = calculate_challenge::<CS>(
            &proof.A_prime,
            &proof.A_bar,
            &proof.d,
            &proof.T1,
            &proof.T2,
            &self.revealed,
            &domain,
            nonce,
        )?;

        let T1 = proof.A_prime * proof.z_e + pk.h0() * proof.z_r2 - (proof.A_bar - proof.d) * c;
        if T1 != proof.T1 {
            return Ok(ProofStatus::BadHiddenMessage);
        }

        let mut revealed_sum = pk.generators.g1_base_point;
        for (i, m) in self.revealed.iter().zip(revealed_messages) {
            revealed_sum += pk.h()[*i] * m.value;
        }
        let mut T2 = proof.d * proof.z_r3 + pk.h0() * proof.z_s - revealed_sum * c;
        for (j, z_m_j) in hidden_indices.iter().zip(&proof.z_m) {
            T2 += pk.h()[*j] * z_m_j;
        }
        if T2 != proof.T2 {
            return Ok(ProofStatus::BadRevealedMessage);
        }

        Ok(ProofStatus::Success)
    }
}

/// Binds the challenge to the signer key, its generators and the ciphersuite
fn calculate_domain<CS>(pk: &BBSplusSchemeKey) -> Result<Scalar, Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    let mut dom_input = pk.to_bytes();
    dom_input.extend_from_slice(CS::ID);
    hash_to_scalar::<CS>(&dom_input, &CS::h2s_dst())
}

/// `A' || Abar || d || T1 || T2 || R || i_1..i_R || domain || len(nonce) || nonce`.
///
/// Revealed messages stay out of the hash: an altered one must fail the `T2` check,
/// not the `T1` one.
#[allow(clippy::too_many_arguments)]
fn calculate_challenge<CS>(
    A_prime: &G1Projective,
    A_bar: &G1Projective,
    d: &G1Projective,
    T1: &G1Projective,
    T2: &G1Projective,
    revealed: &BTreeSet<usize>,
    domain: &Scalar,
    nonce: &ProofNonce,
) -> Result<Scalar, Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    let nonce = nonce.to_bytes();

    let mut c_array: Vec<u8> = Vec::new();
    c_array.extend_from_slice(&g1_to_bytes(A_prime));
    c_array.extend_from_slice(&g1_to_bytes(A_bar));
    c_array.extend_from_slice(&g1_to_bytes(d));
    c_array.extend_from_slice(&g1_to_bytes(T1));
    c_array.extend_from_slice(&g1_to_bytes(T2));
    c_array.extend_from_slice(&i2osp(revealed.len(), 8));
    revealed
        .iter()
        .for_each(|i| c_array.extend_from_slice(&i2osp(*i, 8)));
    c_array.extend_from_slice(&domain.to_bytes_be());
    c_array.extend_from_slice(&i2osp(nonce.len(), 8));
    c_array.extend_from_slice(&nonce);

    hash_to_scalar::<CS>(&c_array, &CS::proof_challenge_dst())
}

fn bitvector_length(total: usize) -> usize {
    (total / 8) + 1
}

/// Bit `i % 8` of byte `i / 8` is set for every revealed index, bytes are then stored big endian
pub(crate) fn revealed_to_bitvector(total: usize, revealed: &BTreeSet<usize>) -> Vec<u8> {
    let mut bytes = vec![0u8; bitvector_length(total)];

    for r in revealed {
        bytes[*r / 8] |= 1u8 << (*r % 8);
    }

    bytes.reverse();
    bytes
}

pub(crate) fn bitvector_to_revealed(data: &[u8]) -> BTreeSet<usize> {
    let mut revealed = BTreeSet::new();

    for (i, byte) in data.iter().rev().enumerate() {
        for bit in 0..8 {
            if byte & (1u8 << bit) != 0 {
                revealed.insert(i * 8 + bit);
            }
        }
    }
    revealed
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff::Field;

    use crate::bbsplus::ciphersuites::{Bls12381Sha256, Bls12381Shake256};
    use crate::keys::pair::KeyPair;
    use crate::schemes::algorithms::BBSplus;

    struct Fixture {
        pk: BBSplusSchemeKey,
        messages: Vec<BBSplusMessage>,
        signature: BBSplusSignature,
    }

    fn fixture<CS>(count: usize) -> Fixture
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let kp = KeyPair::<BBSplus<CS>>::from_seed(Some(b"proof tests")).unwrap();
        let pk = BBSplusSchemeKey::from_public_key::<CS>(kp.public_key(), count).unwrap();
        let messages: Vec<BBSplusMessage> = (0..count)
            .map(|i| BBSplusMessage::hash::<CS>(format!("message {}", i).as_bytes()).unwrap())
            .collect();
        let signature = BBSplusSignature::sign(&messages, kp.private_key(), &pk).unwrap();
        Fixture { pk, messages, signature }
    }

    fn proof_messages(messages: &[BBSplusMessage], revealed: &[usize]) -> Vec<ProofMessage> {
        messages
            .iter()
            .enumerate()
            .map(|(i, m)| {
                if revealed.contains(&i) {
                    ProofMessage::Revealed(*m)
                } else {
                    ProofMessage::Hidden(HiddenMessage::ProofSpecificBlinding(*m))
                }
            })
            .collect()
    }

    fn selective_disclosure<CS>()
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let f = fixture::<CS>(5);
        let nonce = ProofNonce::hash::<CS>(b"verifier nonce").unwrap();
        let pm = proof_messages(&f.messages, &[0, 2, 4]);

        let proof = BBSplusPoKSignature::proof_gen::<CS>(&f.signature, &f.pk, &pm, &nonce).unwrap();
        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), BBSplusPoKSignature::serialized_length(5, 2));

        let parsed = BBSplusPoKSignature::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, proof);

        let revealed = vec![f.messages[0], f.messages[2], f.messages[4]];
        assert_eq!(
            parsed.proof_verify::<CS>(&f.pk, &revealed, &nonce).unwrap(),
            ProofStatus::Success
        );

        let altered = vec![f.messages[0], f.messages[1], f.messages[4]];
        assert_eq!(
            parsed.proof_verify::<CS>(&f.pk, &altered, &nonce).unwrap(),
            ProofStatus::BadRevealedMessage
        );

        let other_nonce = ProofNonce::hash::<CS>(b"other nonce").unwrap();
        assert_eq!(
            parsed.proof_verify::<CS>(&f.pk, &revealed, &other_nonce).unwrap(),
            ProofStatus::BadHiddenMessage
        );
    }

    #[test]
    fn selective_disclosure_sha256() {
        selective_disclosure::<Bls12381Sha256>();
    }

    #[test]
    fn selective_disclosure_shake256() {
        selective_disclosure::<Bls12381Shake256>();
    }

    #[test]
    fn wrong_key_is_a_bad_signature() {
        let f = fixture::<Bls12381Sha256>(3);
        let nonce = ProofNonce::hash::<Bls12381Sha256>(b"n").unwrap();
        let pm = proof_messages(&f.messages, &[1]);
        let proof = BBSplusPoKSignature::proof_gen::<Bls12381Sha256>(&f.signature, &f.pk, &pm, &nonce).unwrap();

        let other = KeyPair::<BBSplus<Bls12381Sha256>>::from_seed(Some(b"someone else")).unwrap();
        let other_pk = BBSplusSchemeKey::from_public_key::<Bls12381Sha256>(other.public_key(), 3).unwrap();
        assert_eq!(
            proof.proof_verify::<Bls12381Sha256>(&other_pk, &[f.messages[1]], &nonce).unwrap(),
            ProofStatus::BadSignature
        );
    }

    #[test]
    fn external_blinding_is_used() {
        let f = fixture::<Bls12381Sha256>(2);
        let nonce = ProofNonce::hash::<Bls12381Sha256>(b"n").unwrap();
        let blinding = HiddenMessage::external_blinding::<Bls12381Sha256>(b"shared blinding").unwrap();
        let pm = vec![
            ProofMessage::Hidden(HiddenMessage::ExternalBlinding(f.messages[0], blinding)),
            ProofMessage::Revealed(f.messages[1]),
        ];
        let proof = BBSplusPoKSignature::proof_gen::<Bls12381Sha256>(&f.signature, &f.pk, &pm, &nonce).unwrap();
        assert_eq!(
            proof.proof_verify::<Bls12381Sha256>(&f.pk, &[f.messages[1]], &nonce).unwrap(),
            ProofStatus::Success
        );
        assert!(HiddenMessage::external_blinding::<Bls12381Sha256>(b"").is_err());
    }

    #[test]
    fn revealed_count_must_match() {
        let f = fixture::<Bls12381Sha256>(3);
        let nonce = ProofNonce::hash::<Bls12381Sha256>(b"n").unwrap();
        let pm = proof_messages(&f.messages, &[0, 1]);
        let proof = BBSplusPoKSignature::proof_gen::<Bls12381Sha256>(&f.signature, &f.pk, &pm, &nonce).unwrap();
        assert!(matches!(
            proof.proof_verify::<Bls12381Sha256>(&f.pk, &[f.messages[0]], &nonce),
            Err(Error::RevealedMismatch(_))
        ));
    }

    fn tampered(change: impl FnOnce(&mut PoKOfSignatureProof)) -> ProofStatus {
        let f = fixture::<Bls12381Sha256>(4);
        let nonce = ProofNonce::hash::<Bls12381Sha256>(b"n").unwrap();
        let pm = proof_messages(&f.messages, &[1, 2]);
        let mut proof = BBSplusPoKSignature::proof_gen::<Bls12381Sha256>(&f.signature, &f.pk, &pm, &nonce).unwrap();
        change(&mut proof.proof);
        proof
            .proof_verify::<Bls12381Sha256>(&f.pk, &[f.messages[1], f.messages[2]], &nonce)
            .unwrap()
    }

    #[test]
    fn untouched_proof_verifies() {
        assert_eq!(tampered(|_| ()), ProofStatus::Success);
    }

    #[test]
    fn tampered_points_fail() {
        assert_eq!(tampered(|p| p.A_bar += G1Projective::GENERATOR), ProofStatus::BadSignature);
        assert_eq!(tampered(|p| p.A_prime += G1Projective::GENERATOR), ProofStatus::BadSignature);
        assert_eq!(tampered(|p| p.d += G1Projective::GENERATOR), ProofStatus::BadHiddenMessage);
        assert_eq!(tampered(|p| p.T1 += G1Projective::GENERATOR), ProofStatus::BadHiddenMessage);
        assert_eq!(tampered(|p| p.T2 += G1Projective::GENERATOR), ProofStatus::BadHiddenMessage);
    }

    #[test]
    fn tampered_responses_fail() {
        assert_eq!(tampered(|p| p.z_e += Scalar::ONE), ProofStatus::BadHiddenMessage);
        assert_eq!(tampered(|p| p.z_r2 += Scalar::ONE), ProofStatus::BadHiddenMessage);
        assert_eq!(tampered(|p| p.z_r3 += Scalar::ONE), ProofStatus::BadRevealedMessage);
        assert_eq!(tampered(|p| p.z_s += Scalar::ONE), ProofStatus::BadRevealedMessage);
        assert_eq!(tampered(|p| p.z_m[0] += Scalar::ONE), ProofStatus::BadRevealedMessage);
        assert_eq!(tampered(|p| p.z_m[1] += Scalar::ONE), ProofStatus::BadRevealedMessage);
    }

    #[test]
    fn proof_is_bound_to_the_revealed_indices() {
        let f = fixture::<Bls12381Sha256>(4);
        let nonce = ProofNonce::hash::<Bls12381Sha256>(b"n").unwrap();
        let pm = proof_messages(&f.messages, &[1]);
        let mut proof = BBSplusPoKSignature::proof_gen::<Bls12381Sha256>(&f.signature, &f.pk, &pm, &nonce).unwrap();
        // claim index 2 was the revealed one instead
        proof.revealed = [2].into_iter().collect();
        assert_eq!(
            proof.proof_verify::<Bls12381Sha256>(&f.pk, &[f.messages[1]], &nonce).unwrap(),
            ProofStatus::BadHiddenMessage
        );
    }

    #[test]
    fn bitvector_layout() {
        let revealed: BTreeSet<usize> = [0, 2, 4, 9].into_iter().collect();
        let bits = revealed_to_bitvector(10, &revealed);
        assert_eq!(bits, vec![0b0000_0010, 0b0001_0101]);
        assert_eq!(bitvector_to_revealed(&bits), revealed);
    }

    #[test]
    fn message_count_prefix() {
        assert_eq!(BBSplusPoKSignature::total_message_count(&[0, 5, 1]).unwrap(), 5);
        assert!(BBSplusPoKSignature::total_message_count(&[0]).is_err());
    }
}
