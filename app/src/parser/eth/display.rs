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
use super::{Erc20Transfer, EthTx, EthTxType};
use crate::constants::{COIN_DECIMALS, DATA_BYTES_TO_PRINT, KECCAK_256_LEN};
use crate::parser::{intstr_to_fpstr_inplace, DisplayableItem};
use crate::utils::u256::{u256, BorrowedU256};
use crate::utils::{app_mode, handle_ui_message, hex_encode, keccak256, ApduPanic, ViewError};

/// Review items of a recognized token transfer, in screen order
#[derive(Clone, Copy)]
enum Erc20Item {
    Receiver,
    Contract,
    Amount,
    Nonce,
    MaxPriorityFee,
    MaxFee,
    GasLimit,
    GasPrice,
    Value,
    Data,
    EthHash,
}

/// Review items of any other transaction, in screen order
#[derive(Clone, Copy)]
enum GenericItem {
    To,
    Value,
    Data,
    MaxPriorityFee,
    MaxFee,
    GasLimit,
    GasPrice,
    Nonce,
    EthHash,
}

// One table per transaction shape, so the index arithmetic
// can not drift when a shape gains or loses an item
const ERC20_LEGACY_ITEMS: &[Erc20Item] = &[
    Erc20Item::Receiver,
    Erc20Item::Contract,
    Erc20Item::Amount,
    Erc20Item::Nonce,
    Erc20Item::GasLimit,
    Erc20Item::GasPrice,
    Erc20Item::Value,
    Erc20Item::Data,
    Erc20Item::EthHash,
];

const ERC20_EIP1559_ITEMS: &[Erc20Item] = &[
    Erc20Item::Receiver,
    Erc20Item::Contract,
    Erc20Item::Amount,
    Erc20Item::Nonce,
    Erc20Item::MaxPriorityFee,
    Erc20Item::MaxFee,
    Erc20Item::GasLimit,
    Erc20Item::Value,
    Erc20Item::Data,
    Erc20Item::EthHash,
];

const GENERIC_LEGACY_ITEMS: &[GenericItem] = &[
    GenericItem::To,
    GenericItem::Value,
    GenericItem::Data,
    GenericItem::GasLimit,
    GenericItem::GasPrice,
    GenericItem::Nonce,
    GenericItem::EthHash,
];

const GENERIC_EIP1559_ITEMS: &[GenericItem] = &[
    GenericItem::To,
    GenericItem::Value,
    GenericItem::Data,
    GenericItem::MaxPriorityFee,
    GenericItem::MaxFee,
    GenericItem::GasLimit,
    GenericItem::Nonce,
    GenericItem::EthHash,
];

fn write_title(label: &[u8], title: &mut [u8]) -> Result<(), ViewError> {
    if title.len() < label.len() + 1 {
        return Err(ViewError::Unknown);
    }

    title[..label.len()].copy_from_slice(label);
    title[label.len()] = 0;

    Ok(())
}

/// Renders a raw big-endian number in decimal
fn render_number(num: &[u8], message: &mut [u8], page: u8) -> Result<u8, ViewError> {
    let num = BorrowedU256::new(num).ok_or(ViewError::Unknown)?;

    let mut out = [0; u256::FORMATTED_SIZE_DECIMAL + 2];
    let len = num.to_u256().to_lexical(&mut out).len();

    handle_ui_message(&out[..len], message, page)
}

/// Renders a raw big-endian number as a fixed point decimal
/// with the given number of fractional digits
fn render_fixed_point(
    num: &[u8],
    decimals: usize,
    message: &mut [u8],
    page: u8,
) -> Result<u8, ViewError> {
    let num = BorrowedU256::new(num).ok_or(ViewError::Unknown)?;

    let mut out = [0; u256::FORMATTED_SIZE_DECIMAL + 2];
    num.to_u256().to_lexical(&mut out);

    let out = intstr_to_fpstr_inplace(&mut out, decimals).map_err(|_| ViewError::Unknown)?;
    let len = out.len();

    handle_ui_message(&out[..len], message, page)
}

/// Renders the first bytes of the calldata in hex, eliding the rest
fn render_data_preview(data: &[u8], message: &mut [u8], page: u8) -> Result<u8, ViewError> {
    let mut out = [0u8; DATA_BYTES_TO_PRINT * 2 + 4];

    let preview_len = data.len().min(DATA_BYTES_TO_PRINT);
    let mut sz = hex_encode(&data[..preview_len], &mut out).map_err(|_| ViewError::Unknown)?;

    if data.len() > DATA_BYTES_TO_PRINT {
        out[sz..sz + 3].copy_from_slice(b"...");
        sz += 3;
    }

    handle_ui_message(&out[..sz], message, page)
}

impl<'b> EthTx<'b> {
    fn generic_items(&self) -> &'static [GenericItem] {
        match self.tx.tx_type() {
            EthTxType::Eip1559 => GENERIC_EIP1559_ITEMS,
            _ => GENERIC_LEGACY_ITEMS,
        }
    }

    fn erc20_items(&self) -> &'static [Erc20Item] {
        match self.tx.tx_type() {
            EthTxType::Eip1559 => ERC20_EIP1559_ITEMS,
            _ => ERC20_LEGACY_ITEMS,
        }
    }

    /// Maps a display index to the item shown there, skipping over
    /// the To and Data entries when those fields are empty
    fn generic_item_at(&self, display_idx: u8) -> Result<GenericItem, ViewError> {
        let has_to = self.tx.to().is_some();
        let has_data = !self.tx.data().is_empty();

        let mut remaining = display_idx;
        for item in self.generic_items() {
            let shown = match item {
                GenericItem::To => has_to,
                GenericItem::Data => has_data,
                _ => true,
            };

            if !shown {
                continue;
            }

            if remaining == 0 {
                return Ok(*item);
            }
            remaining -= 1;
        }

        Err(ViewError::NoData)
    }

    fn num_generic_items(&self) -> u8 {
        let omitted =
            self.tx.to().is_none() as usize + self.tx.data().is_empty() as usize;

        (self.generic_items().len() - omitted) as u8
    }

    /// The Keccak-256 of the whole signing payload, tag byte included
    fn render_eth_hash(&self, message: &mut [u8], page: u8) -> Result<u8, ViewError> {
        let hash = keccak256(self.raw);

        let mut hex = [0u8; KECCAK_256_LEN * 2];
        hex_encode(hash, &mut hex).map_err(|_| ViewError::Unknown)?;

        handle_ui_message(&hex, message, page)
    }

    /// Token amounts scale by the registered decimals; transfers of
    /// unlisted tokens fall back to the raw hex of the amount
    fn render_erc20_amount(
        &self,
        transfer: &Erc20Transfer<'b>,
        message: &mut [u8],
        page: u8,
    ) -> Result<u8, ViewError> {
        match transfer.token() {
            Some(token) => {
                let mut out = [0; u256::FORMATTED_SIZE_DECIMAL + 2];
                transfer.value().to_u256().to_lexical(&mut out);

                let fp_len = intstr_to_fpstr_inplace(&mut out, token.decimals)
                    .map_err(|_| ViewError::Unknown)?
                    .len();

                let ticker = token.ticker.as_bytes();
                let mut composed = [0u8; u256::FORMATTED_SIZE_DECIMAL + 2 + 12];
                composed[..fp_len].copy_from_slice(&out[..fp_len]);
                composed[fp_len] = b' ';
                composed[fp_len + 1..fp_len + 1 + ticker.len()].copy_from_slice(ticker);

                handle_ui_message(&composed[..fp_len + 1 + ticker.len()], message, page)
            }
            None => {
                let amount = transfer.value().bytes();

                let mut out = [0u8; 2 + 64];
                out[..2].copy_from_slice(b"0x");
                let sz =
                    2 + hex_encode(amount, &mut out[2..]).map_err(|_| ViewError::Unknown)?;

                handle_ui_message(&out[..sz], message, page)
            }
        }
    }

    fn render_erc20_item(
        &self,
        transfer: &Erc20Transfer<'b>,
        item_n: u8,
        title: &mut [u8],
        message: &mut [u8],
        page: u8,
    ) -> Result<u8, ViewError> {
        let item = self
            .erc20_items()
            .get(item_n as usize)
            .ok_or(ViewError::NoData)?;

        match item {
            Erc20Item::Receiver => {
                write_title(b"Receiver", title)?;
                transfer.to().render_eth_address(message, page)
            }
            Erc20Item::Contract => {
                write_title(b"Contract", title)?;
                transfer.contract().render_eth_address(message, page)
            }
            Erc20Item::Amount => {
                write_title(b"Amount", title)?;
                self.render_erc20_amount(transfer, message, page)
            }
            Erc20Item::Nonce => {
                write_title(b"Nonce", title)?;
                render_number(self.tx.nonce(), message, page)
            }
            Erc20Item::MaxPriorityFee => {
                write_title(b"Max Priority Fee", title)?;
                let fee = self.tx.priority_fee().ok_or(ViewError::Unknown)?;
                render_number(fee, message, page)
            }
            Erc20Item::MaxFee => {
                write_title(b"Max Fee", title)?;
                let fee = self.tx.max_fee().ok_or(ViewError::Unknown)?;
                render_number(fee, message, page)
            }
            Erc20Item::GasLimit => {
                write_title(b"Gas limit", title)?;
                render_number(self.tx.gas_limit(), message, page)
            }
            Erc20Item::GasPrice => {
                write_title(b"Gas price", title)?;
                let price = self.tx.gas_price().ok_or(ViewError::Unknown)?;
                render_number(price, message, page)
            }
            Erc20Item::Value => {
                write_title(b"Value", title)?;
                render_number(self.tx.value(), message, page)
            }
            Erc20Item::Data => {
                write_title(b"Data", title)?;
                render_data_preview(self.tx.data(), message, page)
            }
            Erc20Item::EthHash => {
                write_title(b"Eth-Hash", title)?;
                self.render_eth_hash(message, page)
            }
        }
    }

    fn render_generic_item(
        &self,
        item_n: u8,
        title: &mut [u8],
        message: &mut [u8],
        page: u8,
    ) -> Result<u8, ViewError> {
        match self.generic_item_at(item_n)? {
            GenericItem::To => {
                write_title(b"To", title)?;
                // should not panic as presence was checked by the index mapping
                self.tx.to().apdu_unwrap().render_eth_address(message, page)
            }
            GenericItem::Value => {
                write_title(b"Value", title)?;
                render_fixed_point(self.tx.value(), COIN_DECIMALS, message, page)
            }
            GenericItem::Data => {
                write_title(b"Data", title)?;
                render_data_preview(self.tx.data(), message, page)
            }
            GenericItem::MaxPriorityFee => {
                write_title(b"Max Priority Fee", title)?;
                let fee = self.tx.priority_fee().ok_or(ViewError::Unknown)?;
                render_number(fee, message, page)
            }
            GenericItem::MaxFee => {
                write_title(b"Max Fee", title)?;
                let fee = self.tx.max_fee().ok_or(ViewError::Unknown)?;
                render_number(fee, message, page)
            }
            GenericItem::GasLimit => {
                write_title(b"Gas limit", title)?;
                render_number(self.tx.gas_limit(), message, page)
            }
            GenericItem::GasPrice => {
                write_title(b"Gas price", title)?;
                let price = self.tx.gas_price().ok_or(ViewError::Unknown)?;
                render_number(price, message, page)
            }
            GenericItem::Nonce => {
                write_title(b"Nonce", title)?;
                render_number(self.tx.nonce(), message, page)
            }
            GenericItem::EthHash => {
                write_title(b"Eth-Hash", title)?;
                self.render_eth_hash(message, page)
            }
        }
    }
}

impl<'b> DisplayableItem for EthTx<'b> {
    fn num_items(&self) -> Result<u8, ViewError> {
        if self.erc20.is_some() {
            Ok(self.erc20_items().len() as u8)
        } else {
            Ok(self.num_generic_items())
        }
    }

    #[inline(never)]
    fn render_item(
        &self,
        item_n: u8,
        title: &mut [u8],
        message: &mut [u8],
        page: u8,
    ) -> Result<u8, ViewError> {
        // clear signing is available only for token transfers,
        // anything else needs the expert mode opt-in
        if let Some(transfer) = self.erc20 {
            self.render_erc20_item(&transfer, item_n, title, message, page)
        } else if app_mode::is_expert_mode() {
            self.render_generic_item(item_n, title, message, page)
        } else {
            Err(ViewError::Reject)
        }
    }
}
