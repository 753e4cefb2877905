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
pub struct Legacy<'b> {
    pub base: BaseLegacy<'b>,
    /// Zero-length for pre-EIP155 transactions
    pub chain_id: &'b [u8],
}

impl<'b> Legacy<'b> {
    /// An unsigned EIP-155 payload carries placeholder r and s fields,
    /// which must be either both empty or both a single zero byte
    fn check_rs_placeholders(r: &RlpItem, s: &RlpItem) -> Result<(), ParserError> {
        let r = r.data();
        let s = s.data();

        let empty = r.is_empty() && s.is_empty();
        let zeroed = matches!(r, [0]) && matches!(s, [0]);

        if empty || zeroed {
            Ok(())
        } else {
            Err(ParserError::InvalidRsValues)
        }
    }
}

impl<'b> FromBytes<'b> for Legacy<'b> {
    fn from_bytes_into(
        input: &'b [u8],
        out: &mut MaybeUninit<Self>,
    ) -> Result<&'b [u8], nom::Err<ParserError>> {
        crate::zlog("Legacy::from_bytes_into\x00");

        let out = out.as_mut_ptr();

        let base_out = unsafe { &mut *addr_of_mut!((*out).base).cast() };
        let rem = BaseLegacy::from_bytes_into(input, base_out)?;

        // a pre-EIP155 payload ends right after the data field
        // and carries no chain id at all
        if rem.is_empty() {
            unsafe {
                addr_of_mut!((*out).chain_id).write(&[]);
            }
            return Ok(rem);
        }

        // EIP-155: chain id plus empty r and s values
        let (rem, chain_id) = read_chain_id(rem)?;

        let (rem, sig_r) = RlpItem::parse(rem)?;
        let (rem, sig_s) = RlpItem::parse(rem)?;
        Self::check_rs_placeholders(&sig_r, &sig_s)?;

        if !rem.is_empty() {
            return Err(ParserError::UnexpectedCharacters.into());
        }

        unsafe {
            addr_of_mut!((*out).chain_id).write(chain_id);
        }

        Ok(rem)
    }
}
