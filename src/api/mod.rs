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

//! Host side driver of the C ABI.
//!
//! Each operation opens a context, pushes the request into it field by field and finishes it,
//! checking the error slot after every call. A context left unfinished because of an error is
//! freed.

/// Module for key pairs and scheme keys
pub mod keys;
pub(crate) mod marshal;
/// Module for requests and responses
pub mod models;
/// Module for the operations
pub mod service;
/// Module for verification outcomes
pub mod status;

pub use keys::{BbsKey, BlsKeyPair};
pub use models::*;
pub use service::*;
pub use status::SignatureProofStatus;
