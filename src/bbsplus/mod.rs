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

//! BBS+ signatures over BLS12-381 with the signature blinding `s` carried in the signature.
//!
//! Keys are bound to a fixed number of messages: the public key `w` is extended with one
//! generator per message ([`keys::BBSplusSchemeKey`]). On top of plain signing the module offers
//! - **Blind issuance**: the holder commits to some messages ([`commitment`]), the signer completes
//!   the signature over the commitment ([`blind`]) and the holder unblinds it.
//! - **Selective disclosure**: a zero-knowledge proof of knowledge of a signature that reveals a
//!   subset of the messages ([`proof`]).

/// Module for blind signatures
pub mod blind;
/// Module for ciphersuites
pub mod ciphersuites;
/// Module for commitments
pub mod commitment;
/// Module for generators
pub mod generators;
/// Module for keys
pub mod keys;
/// Module for messages and nonces
pub mod message;
/// Module for proofs
pub mod proof;
/// Module for signatures
pub mod signature;
