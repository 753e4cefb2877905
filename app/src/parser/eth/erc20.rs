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
use core::mem::MaybeUninit;

use nom::number::complete::be_u32;

use super::EthTransaction;
use crate::constants::ADDRESS_LEN;
use crate::parser::{Address, FromBytes, ParserError};
use crate::utils::u256::BorrowedU256;

/// An entry of the compiled-in token registry. Transfers of tokens
/// not listed here are still recognized, but rendered without a
/// ticker or decimal scaling
pub struct Token {
    pub address: [u8; ADDRESS_LEN],
    pub ticker: &'static str,
    pub decimals: usize,
}

/// Tokens the app can clear-sign with proper decimal formatting.
/// Extending this table requires a firmware rebuild
pub const SUPPORTED_TOKENS: &[Token] = &[
    Token {
        address: [
            0x2f, 0xd4, 0xc9, 0x0e, 0xd2, 0xbb, 0xcd, 0x22, 0xc2, 0xd8, 0x53, 0xac, 0x85, 0xa0,
            0xfc, 0xf1, 0xbb, 0xd8, 0x5b, 0x64,
        ],
        ticker: "WPEAQ",
        decimals: 18,
    },
    Token {
        address: [
            0xbb, 0xa6, 0x0d, 0xa0, 0x6c, 0x2c, 0x54, 0x24, 0xf0, 0x3a, 0xee, 0xf4, 0x3a, 0x4d,
            0x4e, 0x54, 0xb2, 0x65, 0xf4, 0x2f,
        ],
        ticker: "USDC",
        decimals: 6,
    },
    Token {
        address: [
            0x3a, 0x1e, 0x88, 0x76, 0x21, 0x2e, 0x2b, 0x5c, 0x12, 0xbc, 0x7e, 0xb1, 0x49, 0x60,
            0xbf, 0x01, 0xf7, 0x8a, 0x37, 0xa6,
        ],
        ticker: "USDT",
        decimals: 6,
    },
];

/// A `transfer(address,uint256)` call into a token contract, the only
/// shape this app clear-signs.
///
/// Recognition requires the whole of:
/// - no native value moved alongside the call
/// - a 20-byte recipient (the token contract)
/// - calldata of exactly selector + two 32-byte arguments
/// - the selector 0xa9059cbb
/// - a zeroed 12-byte left padding on the address argument
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "derive-debug"), derive(Debug))]
pub struct Erc20Transfer<'b> {
    contract: Address<'b>,
    to: Address<'b>,
    value: BorrowedU256<'b>,
}

impl<'b> Erc20Transfer<'b> {
    pub const SELECTOR: u32 = 0xa905_9cbb;

    // selector + 32-byte address argument + 32-byte amount
    pub const PAYLOAD_LEN: usize = 4 + 32 + 32;

    const ADDRESS_PADDING: usize = 32 - ADDRESS_LEN;

    #[inline(never)]
    pub fn from_tx(tx: &EthTransaction<'b>) -> Option<Self> {
        crate::zlog("Erc20Transfer::from_tx\x00");

        // token transfers move no native value
        if tx.value().iter().any(|b| *b != 0) {
            return None;
        }

        // the recipient of the call is the token contract
        let contract = tx.to()?;

        let data = tx.data();
        if data.len() != Self::PAYLOAD_LEN {
            return None;
        }

        let (rem, selector) = be_u32::<_, ParserError>(data).ok()?;
        if selector != Self::SELECTOR {
            return None;
        }

        // addresses are abi-encoded left-padded to 32 bytes
        let (padding, rem) = rem.split_at(Self::ADDRESS_PADDING);
        if padding.iter().any(|b| *b != 0) {
            return None;
        }

        let mut addr = MaybeUninit::uninit();
        let rem = Address::from_bytes_into(rem, &mut addr).ok()?;
        //address was just initialized
        let to = unsafe { addr.assume_init() };

        let value = BorrowedU256::new(rem)?;

        Some(Self {
            contract,
            to,
            value,
        })
    }

    /// The token contract being called
    pub fn contract(&self) -> &Address<'b> {
        &self.contract
    }

    /// The recipient of the tokens
    pub fn to(&self) -> &Address<'b> {
        &self.to
    }

    pub fn value(&self) -> &BorrowedU256<'b> {
        &self.value
    }

    /// Registry entry for the called contract, if any
    pub fn token(&self) -> Option<&'static Token> {
        SUPPORTED_TOKENS
            .iter()
            .find(|token| token.address == *self.contract.raw_address())
    }
}
