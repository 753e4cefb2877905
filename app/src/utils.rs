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
#![allow(dead_code)]

mod apdu_unwrap;
pub use apdu_unwrap::*;

pub mod app_mode;

mod ui;
pub use ui::{handle_ui_message, ViewError};

pub mod u256;

use crate::constants::KECCAK_256_LEN;
use tiny_keccak::{Hasher, Keccak};

/// This function returns the index of the
/// first null byte in the slice or the total len of the slice,
/// whichever comes first
pub fn rs_strlen(s: &[u8]) -> usize {
    let mut count = 0;
    while let Some(&c) = s.get(count) {
        if c == 0 {
            return count;
        }
        count += 1;
    }

    s.len()
}

pub struct OutputBufferTooSmall;

pub fn hex_encode(
    input: impl AsRef<[u8]>,
    output: &mut [u8],
) -> Result<usize, OutputBufferTooSmall> {
    let input = input.as_ref();

    if input.len() * 2 > output.len() {
        return Err(OutputBufferTooSmall);
    }

    const HEX_CHARS_LOWER: &[u8; 16] = b"0123456789abcdef";

    for (byte, out) in input.iter().zip(output.chunks_mut(2)) {
        let high = HEX_CHARS_LOWER[((byte & 0xf0) >> 4) as usize];
        let low = HEX_CHARS_LOWER[(byte & 0xf) as usize];

        //number of items guaranteed
        // as we checked the size beforehand so
        // output will always be at least the right length
        // to encode input
        out[0] = high;
        out[1] = low;
    }

    Ok(input.len() * 2)
}

/// Keccak-256 of `data`, computed in software so host and
/// device builds hash the very same bytes
#[inline(never)]
pub fn keccak256(data: &[u8]) -> [u8; KECCAK_256_LEN] {
    let mut hasher = Keccak::v256();
    let mut output = [0; KECCAK_256_LEN];

    hasher.update(data);
    hasher.finalize(&mut output);

    output
}
