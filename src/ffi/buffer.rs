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

use std::marker::PhantomData;
use std::{ptr, slice};

pub use ffi_support::{ByteBuffer, FfiStr};

use crate::errors::Error;

/// Borrowed input bytes.
///
/// A null `data` pointer means the value was not provided, a non-null pointer with zero
/// `length` is an empty value. The lifetime ties the view to the storage it points into.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ByteArray<'a> {
    length: usize,
    data: *const u8,
    _marker: PhantomData<&'a [u8]>,
}

impl<'a> Default for ByteArray<'a> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<'a> ByteArray<'a> {
    pub fn absent() -> Self {
        Self {
            length: 0,
            data: ptr::null(),
            _marker: PhantomData,
        }
    }

    pub fn from_slice(data: &'a [u8]) -> Self {
        Self {
            length: data.len(),
            data: data.as_ptr(),
            _marker: PhantomData,
        }
    }

    pub fn from_option(data: Option<&'a [u8]>) -> Self {
        data.map_or_else(Self::absent, Self::from_slice)
    }

    pub fn is_absent(&self) -> bool {
        self.data.is_null()
    }

    /// `None` when absent
    pub fn as_opt_slice(&self) -> Option<&'a [u8]> {
        if self.data.is_null() {
            None
        } else if self.length == 0 {
            Some(&[])
        } else {
            // SAFETY: a non-null view is built from a live slice of `length` bytes
            Some(unsafe { slice::from_raw_parts(self.data, self.length) })
        }
    }

    /// Absent values read as empty
    pub fn as_slice(&self) -> &'a [u8] {
        self.as_opt_slice().unwrap_or(&[])
    }

    /// Fails for absent and empty values
    pub fn required(&self, name: &'static str) -> Result<&'a [u8], Error> {
        match self.as_opt_slice() {
            None => Err(Error::MissingInput(name)),
            Some([]) => Err(Error::EmptyInput(name)),
            Some(bytes) => Ok(bytes),
        }
    }
}

impl<'a> From<&'a [u8]> for ByteArray<'a> {
    fn from(b: &'a [u8]) -> Self {
        Self::from_slice(b)
    }
}

impl<'a> From<&'a Vec<u8>> for ByteArray<'a> {
    fn from(b: &'a Vec<u8>) -> Self {
        Self::from_slice(b)
    }
}

define_bytebuffer_destructor!(bbs_byte_buffer_free);
