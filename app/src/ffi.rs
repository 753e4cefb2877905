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
//! C interface consumed by the APDU dispatcher and the UI loop.
//!
//! The parsed record lives in a single process-wide slot: `parse_eth`
//! is its only writer, every other entry point only reads it. The
//! record borrows the caller's buffer, which must stay alive and
//! unmodified until the next `parse_eth` call replaces the record.

use core::mem::MaybeUninit;
use core::slice;

use crate::parser::{DisplayableItem, EthTx, FromBytes, ParserError};
use crate::utils::ViewError;

mod resources {
    use super::EthTx;

    // Safety: the app is strictly single-threaded, the dispatcher
    // serializes every access to this slot
    static mut ETH_TX: Option<EthTx<'static>> = None;

    pub unsafe fn replace(tx: EthTx<'static>) {
        ETH_TX = Some(tx);
    }

    pub unsafe fn take() {
        ETH_TX = None;
    }

    #[allow(static_mut_refs)]
    pub unsafe fn get() -> Option<&'static EthTx<'static>> {
        ETH_TX.as_ref()
    }
}

impl From<ViewError> for ParserError {
    fn from(err: ViewError) -> Self {
        match err {
            // out of items or pages, the review is over
            ViewError::NoData => ParserError::DisplayPageOutOfRange,
            ViewError::Reject => ParserError::UnsupportedTx,
            ViewError::Unknown => ParserError::UnexpectedError,
        }
    }
}

/// Decode `buffer` into the transaction slot.
///
/// # Safety
/// `buffer` must point to `len` readable bytes that outlive the record,
/// i.e. until the next call to this function
#[no_mangle]
pub unsafe extern "C" fn parse_eth(buffer: *const u8, len: u16) -> u32 {
    crate::zlog("parse_eth\x00");

    // any outcome drops the previous record first, so no stale
    // views into an already recycled buffer can ever be served
    resources::take();

    if buffer.is_null() || len == 0 {
        return ParserError::UnexpectedError as u32;
    }

    let data = slice::from_raw_parts(buffer, len as usize);

    let mut tx = MaybeUninit::uninit();
    match EthTx::from_bytes_into(data, &mut tx) {
        Ok(_) => {
            // fully initialized by the parser
            resources::replace(tx.assume_init());
            ParserError::ParserOk as u32
        }
        Err(e) => ParserError::from(e) as u32,
    }
}

/// Policy check over the record: only recognized ERC-20 transfers
/// pass outside expert mode
#[no_mangle]
pub unsafe extern "C" fn validate_eth() -> u32 {
    let Some(tx) = resources::get() else {
        return ParserError::NoData as u32;
    };

    match tx.validate() {
        Ok(()) => ParserError::ParserOk as u32,
        Err(e) => e as u32,
    }
}

/// Number of review items for the current record
#[no_mangle]
pub unsafe extern "C" fn num_items_eth(num_items: *mut u8) -> u32 {
    if num_items.is_null() {
        return ParserError::UnexpectedError as u32;
    }

    let Some(tx) = resources::get() else {
        return ParserError::NoData as u32;
    };

    match tx.num_items() {
        Ok(n) => {
            *num_items = n;
            ParserError::ParserOk as u32
        }
        Err(e) => ParserError::from(e) as u32,
    }
}

/// Renders one page of one review item into the caller's buffers.
///
/// # Safety
/// `out_key` and `out_val` must point to `key_len` and `val_len`
/// writable bytes respectively
#[no_mangle]
pub unsafe extern "C" fn get_item_eth(
    display_idx: u8,
    out_key: *mut u8,
    key_len: u16,
    out_val: *mut u8,
    val_len: u16,
    page_idx: u8,
    page_count: *mut u8,
) -> u32 {
    crate::zlog("get_item_eth\x00");

    if out_key.is_null() || out_val.is_null() || page_count.is_null() {
        return ParserError::UnexpectedError as u32;
    }

    if key_len == 0 || val_len == 0 {
        return ParserError::UnexpectedError as u32;
    }

    *page_count = 0;

    let key = slice::from_raw_parts_mut(out_key, key_len as usize);
    let val = slice::from_raw_parts_mut(out_val, val_len as usize);
    key.fill(0);
    val.fill(0);

    let Some(tx) = resources::get() else {
        return ParserError::NoData as u32;
    };

    match tx.render_item(display_idx, key, val, page_idx) {
        Ok(pages) => {
            *page_count = pages;
            ParserError::ParserOk as u32
        }
        Err(e) => ParserError::from(e) as u32,
    }
}

/// Recovery byte for the signature of the current record
#[no_mangle]
pub unsafe extern "C" fn compute_v(info: u32, v: *mut u8) -> u32 {
    if v.is_null() {
        return ParserError::UnexpectedError as u32;
    }

    let Some(tx) = resources::get() else {
        return ParserError::NoData as u32;
    };

    match tx.compute_v(info) {
        Ok(value) => {
            *v = value;
            ParserError::ParserOk as u32
        }
        Err(e) => e as u32,
    }
}
