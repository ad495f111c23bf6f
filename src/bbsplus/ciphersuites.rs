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

use digest::HashMarker;
use elliptic_curve::hash2curve::{ExpandMsg, ExpandMsgXmd, ExpandMsgXof};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha3::Shake256;

pub trait BbsCiphersuite: Eq + 'static {
    const ID: &'static [u8];
    const GENERATOR_SEED_DST: &'static [u8];
    const GENERATOR_DST: &'static [u8];
    const BLINDING_G1_DST: &'static [u8];
    const BLINDING_G2_DST: &'static [u8];
    const EXPAND_LEN: usize = 48;
    const IKM_LEN: usize = 32;
    type HashAlg: HashMarker;
    type Expander: ExpandMsg<'static>;

    fn keygen_dst() -> Vec<u8> {
        [Self::ID, b"KEYGEN_DST_"].concat()
    }

    fn h2s_dst() -> Vec<u8> {
        [Self::ID, b"H2S_"].concat()
    }

    fn map_msg_dst() -> Vec<u8> {
        [Self::ID, b"MAP_MSG_TO_SCALAR_AS_HASH_"].concat()
    }

    fn nonce_dst() -> Vec<u8> {
        [Self::ID, b"NONCE_"].concat()
    }

    fn commitment_challenge_dst() -> Vec<u8> {
        [Self::ID, b"BLIND_COMMITMENT_CHALLENGE_"].concat()
    }

    fn proof_challenge_dst() -> Vec<u8> {
        [Self::ID, b"PROOF_CHALLENGE_"].concat()
    }

    fn external_blinding_dst() -> Vec<u8> {
        [Self::ID, b"EXTERNAL_BLINDING_"].concat()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Bls12381Shake256 {}
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Bls12381Sha256 {}

impl BbsCiphersuite for Bls12381Shake256 {
    const ID: &'static [u8] = b"BBS_BLS12381G1_XOF:SHAKE-256_SSWU_RO_";
    const GENERATOR_SEED_DST: &'static [u8] = b"BBS_BLS12381G1_XOF:SHAKE-256_SSWU_RO_SIG_GENERATOR_SEED_";
    const GENERATOR_DST: &'static [u8] = b"BBS_BLS12381G1_XOF:SHAKE-256_SSWU_RO_SIG_GENERATOR_DST_";
    const BLINDING_G1_DST: &'static [u8] = b"BLS12381G1_XOF:SHAKE-256_SSWU_RO_BLS_BLINDING_";
    const BLINDING_G2_DST: &'static [u8] = b"BLS12381G2_XOF:SHAKE-256_SSWU_RO_BLS_BLINDING_";
    type HashAlg = Shake256;
    type Expander = ExpandMsgXof<Self::HashAlg>;
}

impl BbsCiphersuite for Bls12381Sha256 {
    const ID: &'static [u8] = b"BBS_BLS12381G1_XMD:SHA-256_SSWU_RO_";
    const GENERATOR_SEED_DST: &'static [u8] = b"BBS_BLS12381G1_XMD:SHA-256_SSWU_RO_SIG_GENERATOR_SEED_";
    const GENERATOR_DST: &'static [u8] = b"BBS_BLS12381G1_XMD:SHA-256_SSWU_RO_SIG_GENERATOR_DST_";
    const BLINDING_G1_DST: &'static [u8] = b"BLS12381G1_XMD:SHA-256_SSWU_RO_BLS_BLINDING_";
    const BLINDING_G2_DST: &'static [u8] = b"BLS12381G2_XMD:SHA-256_SSWU_RO_BLS_BLINDING_";
    type HashAlg = Sha256;
    type Expander = ExpandMsgXmd<Self::HashAlg>;
}
