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

use crate::constants::ECC_INFO_PARITY_ODD;
use crate::parser::{be_bytes_to_u64, Address, FromBytes, ParserError, RlpItem};
use crate::utils::app_mode;

mod base;
pub use base::BaseLegacy;
mod legacy;
pub use legacy::Legacy;
mod eip1559;
pub use eip1559::Eip1559;
mod eip2930;
pub use eip2930::Eip2930;

mod erc20;
pub use erc20::{Erc20Transfer, Token, SUPPORTED_TOKENS};

mod display;

pub const EIP2930_TX: u8 = 0x01;
pub const EIP1559_TX: u8 = 0x02;
// legacy transactions start right at the RLP list marker
pub const LEGACY_TX: u8 = 0xC0;

// Important: do not change the repr attribute,
// as this type is use as the tag field
// for the EthTransaction enum which has the same representation
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "derive-debug"), derive(Debug))]
#[repr(u8)]
pub enum EthTxType {
    Legacy,
    Eip1559,
    Eip2930,
}

impl EthTxType {
    fn from_bytes(input: &[u8]) -> Result<(&[u8], Self), ParserError> {
        // Check first byte:
        //    0x01 --> EIP2930, tag is consumed
        //    0x02 --> EIP1559, tag is consumed
        // >= 0xC0 --> Legacy, nothing to consume
        let marker = *input.first().ok_or(ParserError::UnexpectedBufferEnd)?;

        match marker {
            EIP2930_TX => Ok((&input[1..], Self::Eip2930)),
            EIP1559_TX => Ok((&input[1..], Self::Eip1559)),
            m if m >= LEGACY_TX => Ok((input, Self::Legacy)),
            _ => Err(ParserError::UnsupportedTx),
        }
    }
}

#[repr(C)]
struct LegacyVariant<'b>(EthTxType, Legacy<'b>);

#[repr(C)]
struct Eip1559Variant<'b>(EthTxType, Eip1559<'b>);

#[repr(C)]
struct Eip2930Variant<'b>(EthTxType, Eip2930<'b>);

#[derive(Clone, Copy, PartialEq, Eq)]
// DO not change the representation
// as it would cause unalignment issues
// with the EthTxType tag
#[repr(u8)]
#[cfg_attr(any(test, feature = "derive-debug"), derive(Debug))]
pub enum EthTransaction<'b> {
    Legacy(Legacy<'b>),
    Eip1559(Eip1559<'b>),
    Eip2930(Eip2930<'b>),
}

impl<'b> EthTransaction<'b> {
    pub fn tx_type(&self) -> EthTxType {
        match self {
            Self::Legacy(_) => EthTxType::Legacy,
            Self::Eip1559(_) => EthTxType::Eip1559,
            Self::Eip2930(_) => EthTxType::Eip2930,
        }
    }

    pub fn chain_id(&self) -> &'b [u8] {
        match self {
            Self::Legacy(t) => t.chain_id,
            Self::Eip1559(t) => t.chain_id,
            Self::Eip2930(t) => t.chain_id,
        }
    }

    pub fn nonce(&self) -> &'b [u8] {
        match self {
            Self::Legacy(t) => t.base.nonce,
            Self::Eip1559(t) => t.nonce,
            Self::Eip2930(t) => t.base.nonce,
        }
    }

    pub fn gas_limit(&self) -> &'b [u8] {
        match self {
            Self::Legacy(t) => t.base.gas_limit,
            Self::Eip1559(t) => t.gas_limit,
            Self::Eip2930(t) => t.base.gas_limit,
        }
    }

    /// Gas price, present on legacy and EIP-2930 transactions only
    pub fn gas_price(&self) -> Option<&'b [u8]> {
        match self {
            Self::Legacy(t) => Some(t.base.gas_price),
            Self::Eip2930(t) => Some(t.base.gas_price),
            Self::Eip1559(_) => None,
        }
    }

    pub fn priority_fee(&self) -> Option<&'b [u8]> {
        match self {
            Self::Eip1559(t) => Some(t.priority_fee),
            _ => None,
        }
    }

    pub fn max_fee(&self) -> Option<&'b [u8]> {
        match self {
            Self::Eip1559(t) => Some(t.max_fee),
            _ => None,
        }
    }

    /// None for contract creation
    pub fn to(&self) -> Option<Address<'b>> {
        match self {
            Self::Legacy(t) => t.base.to,
            Self::Eip1559(t) => t.to,
            Self::Eip2930(t) => t.base.to,
        }
    }

    pub fn value(&self) -> &'b [u8] {
        match self {
            Self::Legacy(t) => t.base.value,
            Self::Eip1559(t) => t.value,
            Self::Eip2930(t) => t.base.value,
        }
    }

    pub fn data(&self) -> &'b [u8] {
        match self {
            Self::Legacy(t) => t.base.data,
            Self::Eip1559(t) => t.data,
            Self::Eip2930(t) => t.base.data,
        }
    }

    /// The pre-declared storage access list, opaque to this app
    pub fn access_list(&self) -> Option<&'b [u8]> {
        match self {
            Self::Legacy(_) => None,
            Self::Eip1559(t) => Some(t.access_list),
            Self::Eip2930(t) => Some(t.access_list),
        }
    }

    /// Recovery byte accompanying the (r, s) signature halves.
    ///
    /// `info` is the parity word reported by the signing primitive,
    /// only its lowest bit is meaningful
    pub fn compute_v(&self, info: u32) -> Result<u8, ParserError> {
        let parity = ((info & ECC_INFO_PARITY_ODD) == 1) as u8;

        match self.tx_type() {
            EthTxType::Eip1559 | EthTxType::Eip2930 => Ok(parity),
            EthTxType::Legacy => {
                let chain_id = self.chain_id();

                if chain_id.is_empty() {
                    // pre-EIP155 transactions used 27 + parity,
                    // see https://eips.ethereum.org/EIPS/eip-155
                    Ok(27 + parity)
                } else {
                    let id = be_bytes_to_u64(chain_id)?;

                    // saturate instead of wrapping so v stays monotone
                    // in the chain id, the caller keeps the low byte
                    let cv = (35 + parity as u32).saturating_add((id as u32).saturating_mul(2));
                    Ok(cv as u8)
                }
            }
        }
    }
}

impl<'b> FromBytes<'b> for EthTransaction<'b> {
    fn from_bytes_into(
        input: &'b [u8],
        out: &mut MaybeUninit<Self>,
    ) -> Result<&'b [u8], nom::Err<ParserError>> {
        // eip2718 defines the transaction structure as
        // tag || rlp[tx_fields]
        // where the tag is present for the typed encodings only
        let (rem, tx_type) = EthTxType::from_bytes(input)?;

        let (rem, list) = RlpItem::parse(rem)?;

        // the transaction fields always come wrapped in a single list
        if !list.is_list() {
            return Err(ParserError::UnexpectedValue.into());
        }

        // nothing can follow the outer list
        if !rem.is_empty() {
            return Err(ParserError::UnexpectedCharacters.into());
        }

        let tx_bytes = list.data();
        if tx_bytes.is_empty() {
            return Err(ParserError::UnexpectedBufferEnd.into());
        }

        match tx_type {
            EthTxType::Legacy => {
                let out = out.as_mut_ptr() as *mut LegacyVariant;

                let legacy = unsafe { &mut *addr_of_mut!((*out).1).cast() };
                _ = Legacy::from_bytes_into(tx_bytes, legacy)?;

                //pointer is valid
                unsafe {
                    addr_of_mut!((*out).0).write(EthTxType::Legacy);
                }
            }
            EthTxType::Eip1559 => {
                let out = out.as_mut_ptr() as *mut Eip1559Variant;

                let eip = unsafe { &mut *addr_of_mut!((*out).1).cast() };
                _ = Eip1559::from_bytes_into(tx_bytes, eip)?;

                //pointer is valid
                unsafe {
                    addr_of_mut!((*out).0).write(EthTxType::Eip1559);
                }
            }
            EthTxType::Eip2930 => {
                let out = out.as_mut_ptr() as *mut Eip2930Variant;

                let eip = unsafe { &mut *addr_of_mut!((*out).1).cast() };
                _ = Eip2930::from_bytes_into(tx_bytes, eip)?;

                //pointer is valid
                unsafe {
                    addr_of_mut!((*out).0).write(EthTxType::Eip2930);
                }
            }
        }

        Ok(rem)
    }
}

/// The full transaction record: the parsed fields, the buffer they
/// borrow from (hashed for the review screen) and the clear-signing
/// classification.
///
/// There is exactly one of these alive at any time, owned by the
/// dispatcher through the slot in [`crate::ffi`]; reparsing replaces
/// it wholesale and invalidates every view of the previous buffer.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "derive-debug"), derive(Debug))]
pub struct EthTx<'b> {
    raw: &'b [u8],
    tx: EthTransaction<'b>,
    erc20: Option<Erc20Transfer<'b>>,
}

impl<'b> EthTx<'b> {
    pub fn transaction(&self) -> &EthTransaction<'b> {
        &self.tx
    }

    /// The exact bytes this record was parsed from
    pub fn raw_tx(&self) -> &'b [u8] {
        self.raw
    }

    pub fn is_erc20_transfer(&self) -> bool {
        self.erc20.is_some()
    }

    pub fn erc20_transfer(&self) -> Option<&Erc20Transfer<'b>> {
        self.erc20.as_ref()
    }

    /// Policy gate: only recognized ERC-20 transfers are signable,
    /// unless the user opted into expert mode
    pub fn validate(&self) -> Result<(), ParserError> {
        if self.erc20.is_none() && !app_mode::is_expert_mode() {
            return Err(ParserError::UnsupportedTx);
        }

        Ok(())
    }

    pub fn compute_v(&self, info: u32) -> Result<u8, ParserError> {
        self.tx.compute_v(info)
    }
}

impl<'b> FromBytes<'b> for EthTx<'b> {
    #[inline(never)]
    fn from_bytes_into(
        input: &'b [u8],
        out: &mut MaybeUninit<Self>,
    ) -> Result<&'b [u8], nom::Err<ParserError>> {
        crate::zlog("EthTx::from_bytes_into\x00");

        let out_ptr = out.as_mut_ptr();

        let tx_out: &mut MaybeUninit<EthTransaction<'b>> =
            unsafe { &mut *addr_of_mut!((*out_ptr).tx).cast() };
        let rem = EthTransaction::from_bytes_into(input, tx_out)?;

        // transaction was just initialized
        let tx = unsafe { &*tx_out.as_ptr() };
        let erc20 = Erc20Transfer::from_tx(tx);

        unsafe {
            addr_of_mut!((*out_ptr).raw).write(input);
            addr_of_mut!((*out_ptr).erc20).write(erc20);
        }

        Ok(rem)
    }
}
