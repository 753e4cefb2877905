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
use crate::parser::{read_chain_id, Address, FromBytes, ParserError, RlpItem};

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "derive-debug"), derive(Debug))]
pub struct Eip1559<'b> {
    pub chain_id: &'b [u8],
    pub nonce: &'b [u8],
    pub priority_fee: &'b [u8],
    pub max_fee: &'b [u8],
    pub gas_limit: &'b [u8],
    // this transaction can deploy a contract too
    pub to: Option<Address<'b>>,
    pub value: &'b [u8],
    pub data: &'b [u8],
    pub access_list: &'b [u8],
    // R and S must be omitted
    // in the unsigned payload, so there are
    // no fields for them here
}

impl<'b> FromBytes<'b> for Eip1559<'b> {
    fn from_bytes_into(
        input: &'b [u8],
        out: &mut MaybeUninit<Self>,
    ) -> Result<&'b [u8], nom::Err<ParserError>> {
        crate::zlog("Eip1559::from_bytes_into\x00");

        let out = out.as_mut_ptr();

        // chainID
        let (rem, chain_id) = read_chain_id(input)?;

        // nonce
        let (rem, nonce) = RlpItem::parse(rem)?;

        // max_priority_fee_per_gas
        let (rem, priority_fee) = RlpItem::parse(rem)?;

        // max_fee_per_gas
        let (rem, max_fee) = RlpItem::parse(rem)?;

        // gas limit
        let (rem, gas_limit) = RlpItem::parse(rem)?;

        // to
        let (rem, raw_address) = RlpItem::parse(rem)?;
        let address = BaseLegacy::read_to_field(raw_address.data())?;

        // value
        let (rem, value) = RlpItem::parse(rem)?;

        // data
        let (rem, data) = RlpItem::parse(rem)?;

        // access list, kept as an opaque view
        let (rem, access_list) = RlpItem::parse(rem)?;

        if !rem.is_empty() {
            return Err(ParserError::UnexpectedCharacters.into());
        }

        unsafe {
            addr_of_mut!((*out).chain_id).write(chain_id);
            addr_of_mut!((*out).nonce).write(nonce.data());
            addr_of_mut!((*out).priority_fee).write(priority_fee.data());
            addr_of_mut!((*out).max_fee).write(max_fee.data());
            addr_of_mut!((*out).gas_limit).write(gas_limit.data());
            addr_of_mut!((*out).to).write(address);
            addr_of_mut!((*out).value).write(value.data());
            addr_of_mut!((*out).data).write(data.data());
            addr_of_mut!((*out).access_list).write(access_list.data());
        }

        Ok(rem)
    }
}
