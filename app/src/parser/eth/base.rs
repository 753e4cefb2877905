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

use crate::constants::ADDRESS_LEN;
use crate::parser::{Address, FromBytes, ParserError, RlpItem};

/// The field block shared by legacy and EIP-2930 transactions:
/// nonce, gas price, gas limit, to, value, data, in wire order.
///
/// All numeric fields stay as the raw big-endian views found in the
/// buffer; interpretation is deferred to the rendering layer
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "derive-debug"), derive(Debug))]
pub struct BaseLegacy<'b> {
    pub nonce: &'b [u8],
    pub gas_price: &'b [u8],
    pub gas_limit: &'b [u8],
    // empty means contract creation
    pub to: Option<Address<'b>>,
    pub value: &'b [u8],
    pub data: &'b [u8],
}

impl<'b> BaseLegacy<'b> {
    /// An address field is either empty or exactly 20 bytes
    pub(crate) fn read_to_field(
        raw_address: &'b [u8],
    ) -> Result<Option<Address<'b>>, nom::Err<ParserError>> {
        match raw_address.len() {
            0 => Ok(None),
            x if x == ADDRESS_LEN => {
                let mut addr = MaybeUninit::uninit();
                _ = Address::from_bytes_into(raw_address, &mut addr)?;
                Ok(Some(unsafe { addr.assume_init() }))
            }
            _ => Err(ParserError::InvalidAddress.into()),
        }
    }
}

impl<'b> FromBytes<'b> for BaseLegacy<'b> {
    #[inline(never)]
    fn from_bytes_into(
        input: &'b [u8],
        out: &mut MaybeUninit<Self>,
    ) -> Result<&'b [u8], nom::Err<ParserError>> {
        crate::zlog("BaseLegacy::from_bytes_into\x00");

        let out = out.as_mut_ptr();

        // nonce
        let (rem, nonce) = RlpItem::parse(input)?;

        // gas price
        let (rem, gas_price) = RlpItem::parse(rem)?;

        // gas limit
        let (rem, gas_limit) = RlpItem::parse(rem)?;

        // to
        let (rem, raw_address) = RlpItem::parse(rem)?;
        let address = Self::read_to_field(raw_address.data())?;

        // value
        let (rem, value) = RlpItem::parse(rem)?;

        // data
        let (rem, data) = RlpItem::parse(rem)?;

        unsafe {
            addr_of_mut!((*out).nonce).write(nonce.data());
            addr_of_mut!((*out).gas_price).write(gas_price.data());
            addr_of_mut!((*out).gas_limit).write(gas_limit.data());
            addr_of_mut!((*out).to).write(address);
            addr_of_mut!((*out).value).write(value.data());
            addr_of_mut!((*out).data).write(data.data());
        }

        Ok(rem)
    }
}
