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

//! Error slot of every entry point, as defined by `ffi_support`.

use std::mem;

pub use ffi_support::{ErrorCode, ExternError};

use crate::errors::Error;

/// Status codes written into the error slot
pub mod codes {
    pub const SUCCESS: i32 = 0;
    /// Validation or cryptographic failure
    pub const ENGINE: i32 = 1;
    pub const KEY_DERIVATION: i32 = 2;
    pub const PANIC: i32 = -1;
    pub const INVALID_HANDLE: i32 = -1000;
}

impl From<Error> for ExternError {
    fn from(e: Error) -> Self {
        ExternError::new_error(ErrorCode::new(codes::ENGINE), e.to_string())
    }
}

/// A BLS key that cannot be turned into a scheme key
pub(crate) struct KeyDerivationError(pub(crate) Error);

impl From<KeyDerivationError> for ExternError {
    fn from(e: KeyDerivationError) -> Self {
        ExternError::new_error(ErrorCode::new(codes::KEY_DERIVATION), e.0.to_string())
    }
}

define_string_destructor!(bbs_string_free);

/// Code of the last call written into `err`
pub fn status(err: &ExternError) -> i32 {
    err.get_code().code()
}

/// Releases the message of `err`, leaving a success in the slot
pub fn take_message(err: &mut ExternError) -> Option<String> {
    let taken = mem::replace(err, ExternError::success());
    // SAFETY: the message was allocated by `ExternError::new_error` and is released only here
    unsafe { taken.get_and_consume_message() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffi_support::{call_with_output, call_with_result};

    #[test]
    fn errors_carry_code_and_message() {
        let mut err = ExternError::success();
        let value: u64 = call_with_result(&mut err, || Err::<u64, _>(Error::EmptyInput("Message")));
        assert_eq!(value, 0);
        assert_eq!(status(&err), codes::ENGINE);
        assert_eq!(take_message(&mut err).as_deref(), Some("Message cannot be empty"));
        assert_eq!(status(&err), codes::SUCCESS);
        assert_eq!(take_message(&mut err), None);
    }

    #[test]
    fn key_derivation_has_its_own_code() {
        let mut err = ExternError::success();
        let _: i32 = call_with_result(&mut err, || {
            Err::<i32, _>(KeyDerivationError(Error::InvalidMessageCount))
        });
        assert_eq!(status(&err), codes::KEY_DERIVATION);
        take_message(&mut err);
    }

    #[test]
    fn panics_are_caught() {
        let mut err = ExternError::success();
        let value: i32 = call_with_output(&mut err, || -> i32 { panic!("boom") });
        assert_eq!(value, 0);
        assert_eq!(status(&err), codes::PANIC);
        take_message(&mut err);

        assert_eq!(ErrorCode::PANIC.code(), codes::PANIC);
        assert_eq!(ErrorCode::INVALID_HANDLE.code(), codes::INVALID_HANDLE);
    }
}
