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

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Outcome of a proof or commitment verification.
///
/// These are normal results, not errors: a failed check is reported here while malformed
/// input surfaces as [`Error`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[repr(i32)]
pub enum SignatureProofStatus {
    Success = 200,
    BadSignature = 400,
    BadHiddenMessage = 401,
    BadRevealedMessage = 402,
}

const DESCRIPTIONS: [(SignatureProofStatus, &str); 4] = [
    (SignatureProofStatus::Success, "The proof verified"),
    (
        SignatureProofStatus::BadSignature,
        "The proof failed because the signature proof of knowledge failed",
    ),
    (
        SignatureProofStatus::BadHiddenMessage,
        "The proof failed because a hidden message was invalid when the proof was created",
    ),
    (
        SignatureProofStatus::BadRevealedMessage,
        "The proof failed because a revealed message was invalid",
    ),
];

impl SignatureProofStatus {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn description(&self) -> &'static str {
        DESCRIPTIONS
            .iter()
            .find(|(status, _)| status == self)
            .map(|(_, d)| *d)
            .unwrap_or_default()
    }

    pub fn is_success(&self) -> bool {
        *self == SignatureProofStatus::Success
    }
}

impl TryFrom<i32> for SignatureProofStatus {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        DESCRIPTIONS
            .iter()
            .map(|(status, _)| *status)
            .find(|status| status.code() == code)
            .ok_or(Error::UnknownStatus(code))
    }
}

impl fmt::Display for SignatureProofStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}
