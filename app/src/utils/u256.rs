/*******************************************************************************
*   (c) 2024 Zondax AG
*
*  Licensed under the Apache License, Version 2.0 (the "License");
*  you may not use this file except in compliance with the License.
*  You may obtain a copy of the License at
*
*      http://www.apache.org/licenses/LICENSE-2.0
*
*  Unless required by applicable law or agreed to in writing, software
*  distributed under the License is distributed on an "AS IS" BASIS,
*  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
*  See the License for the specific language governing permissions and
*  limitations under the License.
********************************************************************************/
#![allow(non_camel_case_types)]

use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer, word-by-word on the stack
    pub struct u256(4);
}

impl u256 {
    ///u256::MAX is
    /// 115792089237316195423570985008687907853269984665640564039457584007913129639935
    /// which is 78 characters long
    pub const FORMATTED_SIZE_DECIMAL: usize = 78;

    /// Formats the number in decimal into the provided buffer and
    /// returns the subslice that was actually written.
    ///
    /// # Panic
    /// Will panic if there's not enough space in the input slice,
    /// use a buffer of size [`Self::FORMATTED_SIZE_DECIMAL`]
    pub fn to_lexical(mut self, bytes: &mut [u8]) -> &mut [u8] {
        let ten = Self::from(10u64);

        //write it from the front
        // this is counter intuitive since we start
        // with the digit with the smallest position
        // but later we'll .reverse() the slice
        // so it's ordered properly
        let mut i = 0;
        loop {
            let (this, digit) = self.div_mod(ten);

            bytes[i] = b'0' + digit.low_u64() as u8;
            i += 1;

            if this.is_zero() {
                let bytes = &mut bytes[..i];
                bytes.reverse();

                break bytes;
            }

            self = this;
        }
    }
}

/// A view over the big-endian bytes of a number of at most 256 bits,
/// as found in RLP integer fields and ABI-encoded call arguments
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "derive-debug"), derive(Debug))]
pub struct BorrowedU256<'b>(&'b [u8]);

impl<'b> BorrowedU256<'b> {
    pub fn new(bytes: &'b [u8]) -> Option<Self> {
        if bytes.len() > core::mem::size_of::<u256>() {
            return None;
        }

        Some(Self(bytes))
    }

    pub fn bytes(&self) -> &'b [u8] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn to_u256(&self) -> u256 {
        // length was verified on construction
        u256::from_big_endian(self.0)
    }
}
