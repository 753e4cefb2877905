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
use nom::bytes::complete::take;

use crate::constants::U64_SIZE;
use crate::parser::ParserError;

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "derive-debug"), derive(Debug))]
pub enum RlpKind {
    // a value below 0x80, the byte is its own payload
    Byte,
    ShortString,
    LongString,
    ShortList,
    LongList,
}

/// A decoded RLP node. Items are views over the input buffer,
/// no payload bytes are ever copied, so an item is usable only
/// while the buffer it was parsed from is alive.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "derive-debug"), derive(Debug))]
pub struct RlpItem<'b> {
    pub kind: RlpKind,
    data: &'b [u8],
}

impl<'b> RlpItem<'b> {
    /// Payload bytes of this item. For lists this is the concatenation
    /// of the encoded inner items, to be parsed with a nested cursor.
    pub fn data(&self) -> &'b [u8] {
        self.data
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, RlpKind::ShortList | RlpKind::LongList)
    }

    /// Reads one item from the front of `input`.
    ///
    /// Returns the remaining bytes along with the parsed item,
    /// erroring out if the declared payload overruns the input.
    #[inline(never)]
    pub fn parse(input: &'b [u8]) -> Result<(&'b [u8], Self), nom::Err<ParserError>> {
        let marker = *input.first().ok_or(ParserError::UnexpectedBufferEnd)?;

        let (kind, header_len, payload_len) = match marker {
            _byte @ 0..=0x7F => {
                // the marker is the payload
                let item = Self {
                    kind: RlpKind::Byte,
                    data: &input[..1],
                };
                return Ok((&input[1..], item));
            }
            sstring @ 0x80..=0xB7 => (RlpKind::ShortString, 1, sstring as u64 - 0x80),
            lstring @ 0xB8..=0xBF => {
                let (header_len, len) = Self::read_long_len(input, lstring as usize - 0xB7)?;
                (RlpKind::LongString, header_len, len)
            }
            slist @ 0xC0..=0xF7 => (RlpKind::ShortList, 1, slist as u64 - 0xC0),
            llist @ 0xF8.. => {
                let (header_len, len) = Self::read_long_len(input, llist as usize - 0xF7)?;
                (RlpKind::LongList, header_len, len)
            }
        };

        let rem = input
            .get(header_len..)
            .ok_or(ParserError::UnexpectedBufferEnd)?;
        let (rem, data) = take(payload_len as usize)(rem)?;

        Ok((rem, Self { kind, data }))
    }

    /// For strings and lists longer than 55 bytes the payload length
    /// is itself length-prefixed: the marker encodes how many bytes
    /// compose the length, and the length follows BE encoded.
    ///
    /// Strict RLP caps the length at 64 bits and forbids leading
    /// zeroes in the encoded length.
    fn read_long_len(input: &[u8], num_bytes: usize) -> Result<(usize, u64), ParserError> {
        if num_bytes > U64_SIZE {
            return Err(ParserError::InvalidRlpLength);
        }

        let len_bytes = input
            .get(1..)
            .ok_or(ParserError::UnexpectedBufferEnd)?
            .get(..num_bytes)
            .ok_or(ParserError::UnexpectedBufferEnd)?;

        if len_bytes[0] == 0 {
            return Err(ParserError::NonCanonicalRlp);
        }

        let mut array = [0; U64_SIZE];
        array[U64_SIZE - num_bytes..].copy_from_slice(len_bytes);

        Ok((1 + num_bytes, u64::from_be_bytes(array)))
    }
}
