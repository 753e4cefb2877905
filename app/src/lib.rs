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
#![cfg_attr(not(test), no_std)]
#![no_builtins]
#![allow(clippy::manual_range_contains)]

#[cfg(not(test))]
use core::panic::PanicInfo;

mod constants;
pub mod ffi;
mod parser;
mod utils;

#[cfg(test)]
mod integration_tests;

pub use constants::*;
pub use parser::{
    Address, DisplayableItem, Erc20Transfer, EthTransaction, EthTx, EthTxType, FromBytes,
    ParserError, RlpItem, RlpKind, Token, SUPPORTED_TOKENS,
};
pub use utils::{handle_ui_message, ViewError};

#[cfg(not(test))]
#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    loop {}
}

cfg_if::cfg_if! {
    if #[cfg(all(not(test), target_os = "none"))] {
        extern "C" {
            fn zemu_log_stack(s: *const u8);
        }

        /// Log a null-terminated message through the emulator/device channel
        pub(crate) fn zlog(msg: &str) {
            unsafe { zemu_log_stack(msg.as_bytes().as_ptr()) }
        }
    } else {
        pub(crate) fn zlog(_msg: &str) {}
    }
}
