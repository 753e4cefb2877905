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

pub const PEAQ_MAINNET_CHAIN_ID: u64 = 3338;
pub const PEAQ_TESTNET_CHAIN_ID: u64 = 9990;
pub const PEAQ_CANARY_CHAIN_ID: u64 = 2241;

/// Networks this app will sign for, anything else is rejected at parse time
pub const SUPPORTED_CHAIN_IDS: [u64; 3] = [
    PEAQ_MAINNET_CHAIN_ID,
    PEAQ_TESTNET_CHAIN_ID,
    PEAQ_CANARY_CHAIN_ID,
];

/// The native coin uses wei-style base units
pub const COIN_DECIMALS: usize = 18;

pub const ADDRESS_LEN: usize = 20;

pub const KECCAK_256_LEN: usize = 32;

/// How many bytes of the calldata are shown before eliding with "..."
pub const DATA_BYTES_TO_PRINT: usize = 16;

/// Parity flag as reported by the signing primitive info word
pub const ECC_INFO_PARITY_ODD: u32 = 1;

pub const U64_SIZE: usize = core::mem::size_of::<u64>();
