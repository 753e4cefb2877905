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
use crate::constants::{SUPPORTED_CHAIN_IDS, U64_SIZE};
use crate::parser::{be_bytes_to_u64, ParserError, RlpItem, RlpKind};

/// Reads one RLP item and interprets it as a chain identifier.
///
/// The id is either a single-byte item whose marker is the value
/// itself, or a string of up to 8 big-endian bytes. Whatever the
/// encoding, the decoded value must be one of the supported peaq
/// networks.
///
/// Returns the remaining input and the raw bytes of the id, which
/// are kept in the transaction record for the v computation.
#[inline(never)]
pub fn read_chain_id(input: &[u8]) -> Result<(&[u8], &[u8]), nom::Err<ParserError>> {
    let (rem, item) = RlpItem::parse(input)?;

    let id_bytes = item.data();
    let id = match item.kind {
        RlpKind::Byte => id_bytes[0] as u64,
        RlpKind::ShortString | RlpKind::LongString => {
            if id_bytes.is_empty() || id_bytes.len() > U64_SIZE {
                return Err(ParserError::UnexpectedError.into());
            }
            be_bytes_to_u64(id_bytes)?
        }
        _ => return Err(ParserError::UnexpectedValue.into()),
    };

    if !SUPPORTED_CHAIN_IDS.contains(&id) {
        return Err(ParserError::InvalidChainId.into());
    }

    Ok((rem, id_bytes))
}
