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

use elliptic_curve::hash2curve::{ExpandMsg, Expander};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::bbsplus::ciphersuites::BbsCiphersuite;
use crate::bbsplus::keys::{key_gen, sk_to_pk, BBSplusPublicKey, BBSplusSecretKey};
use crate::errors::Error;
use crate::schemes::algorithms::{BBSplus, Scheme};

/// Secret key with its G2 public key
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct KeyPair<S: Scheme> {
    pub(crate) public: S::PubKey,
    pub(crate) private: S::PrivKey,
}

impl<S: Scheme> KeyPair<S> {
    pub fn public_key(&self) -> &S::PubKey {
        &self.public
    }

    pub fn private_key(&self) -> &S::PrivKey {
        &self.private
    }

    /// `(sk, pk)`
    pub fn into_parts(self) -> (S::PrivKey, S::PubKey) {
        (self.private, self.public)
    }
}

impl<CS: BbsCiphersuite> KeyPair<BBSplus<CS>>
where
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    /// # Description
    /// Derives the key pair from at least 32 bytes of key material.
    ///
    /// # Inputs:
    /// * `key_material` (REQUIRED), secret octet string.
    /// * `key_info` (OPTIONAL), defaults to an empty string.
    /// * `key_dst` (OPTIONAL), defaults to ciphersuite_id || "KEYGEN_DST_".
    pub fn generate(
        key_material: &[u8],
        key_info: Option<&[u8]>,
        key_dst: Option<&[u8]>,
    ) -> Result<Self, Error> {
        let sk = key_gen::<CS>(key_material, key_info, key_dst)?;
        Ok(Self {
            public: BBSplusPublicKey(sk_to_pk(sk)),
            private: BBSplusSecretKey(sk),
        })
    }

    /// Same seed, same pair. Without a seed the key material is drawn from the thread rng.
    pub fn from_seed(seed: Option<&[u8]>) -> Result<Self, Error> {
        let mut key_material = vec![0u8; CS::IKM_LEN];
        match seed {
            Some(seed) => expand_seed::<CS>(seed, &mut key_material)?,
            None => rand::thread_rng().fill_bytes(&mut key_material),
        }
        Self::generate(&key_material, None, None)
    }
}

fn expand_seed<CS>(seed: &[u8], out: &mut [u8]) -> Result<(), Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    let dst = [CS::ID, b"KEYGEN_SEED_"].concat();
    CS::Expander::expand_message(&[seed], &[dst.as_slice()], out.len())
        .map_err(|_| Error::KeyGenError("cannot expand seed".to_owned()))?
        .fill_bytes(out);
    Ok(())
}
