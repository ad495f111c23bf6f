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

use bls12_381_plus::G1Projective;
use elliptic_curve::group::Curve;
use elliptic_curve::hash2curve::{ExpandMsg, Expander};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use super::ciphersuites::BbsCiphersuite;
use crate::errors::Error;
use crate::utils::util::i2osp;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Generators {
    pub g1_base_point: G1Projective,
    /// `h0`, the generator of the signature blinding `s`
    pub q1: G1Projective,
    pub message_generators: Vec<G1Projective>,
}

impl Serialize for Generators {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let result: Vec<String> = self
            .message_generators
            .iter()
            .map(|item| hex::encode(item.to_affine().to_compressed()))
            .collect();

        let mut state = serializer.serialize_struct("Generators", 3)?;
        state.serialize_field(
            "BP",
            &hex::encode(self.g1_base_point.to_affine().to_compressed()),
        )?;
        state.serialize_field("Q1", &hex::encode(self.q1.to_affine().to_compressed()))?;
        state.serialize_field("MsgGenerators", &result)?;
        state.end()
    }
}

impl Generators {
    /// # Description
    /// Derives `h0` followed by `count` message generators from `seed`.
    /// The derivation is a chain, so the generators for `n` messages are a prefix of the generators for `n + k`.
    ///
    /// # Inputs:
    /// * `seed`, octet string, the compressed G2 public key the generators are bound to
    /// * `count`, number of message generators
    pub fn create<CS>(seed: &[u8], count: usize) -> Result<Generators, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let points = Self::create_generators::<CS>(seed, count + 1)?;

        Ok(Generators {
            g1_base_point: G1Projective::GENERATOR,
            q1: points[0],
            message_generators: points[1..].to_vec(),
        })
    }

    fn create_generators<CS>(seed: &[u8], len: usize) -> Result<Vec<G1Projective>, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let mut generators: Vec<G1Projective> = Vec::with_capacity(len);

        let mut v = vec![0u8; CS::EXPAND_LEN];
        CS::Expander::expand_message(&[seed], &[CS::GENERATOR_SEED_DST], CS::EXPAND_LEN)
            .map_err(|_| Error::NotEnoughGenerators)?
            .fill_bytes(&mut v);

        let mut n = 1usize;
        while generators.len() < len {
            let input = [v.as_slice(), &i2osp(n, 4)].concat();
            CS::Expander::expand_message(&[input.as_slice()], &[CS::GENERATOR_SEED_DST], CS::EXPAND_LEN)
                .map_err(|_| Error::NotEnoughGenerators)?
                .fill_bytes(&mut v);
            n += 1;

            let candidate = G1Projective::hash::<CS::Expander>(&v, CS::GENERATOR_DST);
            if !generators.contains(&candidate) {
                generators.push(candidate);
            }
        }

        Ok(generators)
    }
}
