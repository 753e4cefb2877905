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
use core::{mem::MaybeUninit, ptr::addr_of_mut};

use super::BaseLegacy;
use crate::parser::{read_chain_id, FromBytes, ParserError, RlpItem};

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "derive-debug"), derive(Debug))]
pub struct Eip2930<'b> {
    pub chain_id: &'b [u8],
    pub base: BaseLegacy<'b>,
    pub access_list: &'b [u8],
    // R and S must be omitted
    // in the unsigned payload, so there are
    // no fields for them here
}

impl<'b> FromBytes<'b> for Eip2930<'b> {
    fn from_bytes_into(
        input: &'b [u8],
        out: &mut MaybeUninit<Self>,
    ) -> Result<&'b [u8], nom::Err<ParserError>> {
        crate::zlog("Eip2930::from_bytes_into\x00");

        let out = out.as_mut_ptr();

        // chainID
        let (rem, chain_id) = read_chain_id(input)?;

        let base_out = unsafe { &mut *addr_of_mut!((*out).base).cast() };
        let rem = BaseLegacy::from_bytes_into(rem, base_out)?;

        // access list, kept as an opaque view
        let (rem, access_list) = RlpItem::parse(rem)?;

        if !rem.is_empty() {
            return Err(ParserError::UnexpectedCharacters.into());
        }

        unsafe {
            addr_of_mut!((*out).chain_id).write(chain_id);
            addr_of_mut!((*out).access_list).write(access_list.data());
        }

        Ok(rem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserError;

    fn tx_fields() -> Vec<u8> {
        // chain id 2241, then the legacy field block, then an empty
        // access list
        let mut data = hex::decode("8208c1").unwrap();
        data.extend_from_slice(
            &hex::decode("0185012a05f2008252089428ee52a8f3d6e5d15f8b131996950d7f296c79528080")
                .unwrap(),
        );
        data.extend_from_slice(&[0xC0]);
        data
    }

    #[test]
    fn parse_eip2930() {
        let data = tx_fields();
        let (rem, tx) = Eip2930::from_bytes(&data).unwrap();

        assert!(rem.is_empty());
        assert_eq!(tx.chain_id, &[0x08, 0xC1]);
        assert_eq!(tx.base.nonce, &[0x01]);
        assert!(tx.access_list.is_empty());
    }

    #[test]
    fn trailing_fields_rejected() {
        let mut data = tx_fields();
        data.push(0x80);

        let err = Eip2930::from_bytes(&data).unwrap_err();
        assert_eq!(ParserError::from(err), ParserError::UnexpectedCharacters);
    }
}
