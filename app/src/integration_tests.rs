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
use proptest::prelude::*;
use std::sync::Mutex;

use crate::parser::{
    DisplayableItem, Erc20Transfer, EthTransaction, EthTx, EthTxType, FromBytes, ParserError,
    SUPPORTED_TOKENS,
};
use crate::utils::{app_mode, rs_strlen, ViewError};

// The expert-mode mock is process-wide state, tests that depend on it
// serialize through this lock
static EXPERT_GUARD: Mutex<()> = Mutex::new(());

const RECIPIENT: [u8; 20] = [
    0x8d, 0xf3, 0x84, 0x5f, 0x25, 0xba, 0x0c, 0xe5, 0xa9, 0x74, 0xc3, 0x0d, 0xb2, 0xf2, 0xe2,
    0x4b, 0x7c, 0x2a, 0x1e, 0xa4,
];

/// Minimal RLP encoder to build test vectors with
fn rlp_string(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    match payload.len() {
        1 if payload[0] < 0x80 => out.push(payload[0]),
        len if len <= 55 => {
            out.push(0x80 + len as u8);
            out.extend_from_slice(payload);
        }
        len => {
            assert!(len <= 0xFFFF);
            let be = (len as u16).to_be_bytes();
            if be[0] == 0 {
                out.push(0xB8);
                out.push(be[1]);
            } else {
                out.push(0xB9);
                out.extend_from_slice(&be);
            }
            out.extend_from_slice(payload);
        }
    }
    out
}

fn rlp_list(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    match payload.len() {
        len if len <= 55 => out.push(0xC0 + len as u8),
        len => {
            assert!(len <= 0xFFFF);
            let be = (len as u16).to_be_bytes();
            if be[0] == 0 {
                out.push(0xF8);
                out.push(be[1]);
            } else {
                out.push(0xF9);
                out.extend_from_slice(&be);
            }
        }
    }
    out.extend_from_slice(payload);
    out
}

fn transfer_calldata(recipient: &[u8; 20], amount: u64) -> Vec<u8> {
    let mut data = 0xa9059cbbu32.to_be_bytes().to_vec();
    data.extend_from_slice(&[0; 12]);
    data.extend_from_slice(recipient);
    let mut arg = [0u8; 32];
    arg[24..].copy_from_slice(&amount.to_be_bytes());
    data.extend_from_slice(&arg);
    data
}

struct TxSpec<'a> {
    tx_type: EthTxType,
    chain_id: &'a [u8],
    to: &'a [u8],
    value: &'a [u8],
    data: &'a [u8],
}

/// Assembles a full unsigned transaction for the given shape
fn build_tx(spec: TxSpec) -> Vec<u8> {
    let mut fields = Vec::new();

    if spec.tx_type != EthTxType::Legacy {
        fields.extend(rlp_string(spec.chain_id));
    }

    // nonce
    fields.extend(rlp_string(&[0x03]));
    match spec.tx_type {
        EthTxType::Eip1559 => {
            // tip and cap
            fields.extend(rlp_string(&0x59682f00u32.to_be_bytes()));
            fields.extend(rlp_string(&[0x06, 0xfc, 0x23, 0xac, 0x00]));
        }
        _ => {
            // gas price
            fields.extend(rlp_string(&[0x06, 0xfc, 0x23, 0xac, 0x00]));
        }
    }
    // gas limit
    fields.extend(rlp_string(&[0x52, 0x08]));
    fields.extend(rlp_string(spec.to));
    fields.extend(rlp_string(spec.value));
    fields.extend(rlp_string(spec.data));

    match spec.tx_type {
        EthTxType::Legacy => {
            if !spec.chain_id.is_empty() {
                fields.extend(rlp_string(spec.chain_id));
                fields.extend_from_slice(&[0x80, 0x80]);
            }
        }
        _ => {
            // empty access list
            fields.push(0xC0);
        }
    }

    let mut tx = match spec.tx_type {
        EthTxType::Legacy => Vec::new(),
        EthTxType::Eip2930 => vec![0x01],
        EthTxType::Eip1559 => vec![0x02],
    };
    tx.extend(rlp_list(&fields));
    tx
}

fn item_key(tx: &EthTx, idx: u8) -> String {
    let mut title = [0u8; 32];
    let mut message = [0u8; 256];
    tx.render_item(idx, &mut title, &mut message, 0).unwrap();
    String::from_utf8(title[..rs_strlen(&title)].to_vec()).unwrap()
}

fn item_value(tx: &EthTx, idx: u8) -> String {
    let mut title = [0u8; 32];
    let mut message = [0u8; 256];
    tx.render_item(idx, &mut title, &mut message, 0).unwrap();
    String::from_utf8(message[..rs_strlen(&message)].to_vec()).unwrap()
}

fn item_keys(tx: &EthTx) -> Vec<String> {
    (0..tx.num_items().unwrap())
        .map(|i| item_key(tx, i))
        .collect()
}

#[test]
fn pre_eip155_legacy_transfer() {
    let data = build_tx(TxSpec {
        tx_type: EthTxType::Legacy,
        chain_id: &[],
        to: &RECIPIENT,
        value: &[],
        data: &[],
    });

    let (_, tx) = EthTx::from_bytes(&data).unwrap();
    assert_eq!(tx.transaction().tx_type(), EthTxType::Legacy);
    assert!(tx.transaction().chain_id().is_empty());
    assert!(!tx.is_erc20_transfer());

    assert_eq!(tx.num_items().unwrap(), 6);

    let _guard = EXPERT_GUARD.lock().unwrap_or_else(|e| e.into_inner());

    // not a token transfer, refused outside expert mode
    app_mode::set_expert_mode(false);
    assert_eq!(tx.validate(), Err(ParserError::UnsupportedTx));

    app_mode::set_expert_mode(true);
    assert_eq!(tx.validate(), Ok(()));
    assert_eq!(
        item_keys(&tx),
        ["To", "Value", "Gas limit", "Gas price", "Nonce", "Eth-Hash"]
    );
    assert_eq!(item_value(&tx, 1), "0.000000000000000000");
    app_mode::set_expert_mode(false);
}

#[test]
fn eip155_legacy_accepted_chain() {
    let data = build_tx(TxSpec {
        tx_type: EthTxType::Legacy,
        chain_id: &[0x0D, 0x0A],
        to: &RECIPIENT,
        value: &[0x01],
        data: &[],
    });

    let (_, tx) = EthTx::from_bytes(&data).unwrap();
    assert_eq!(tx.transaction().chain_id(), &[0x0D, 0x0A]);
}

#[test]
fn eip155_legacy_rejected_chain() {
    let data = build_tx(TxSpec {
        tx_type: EthTxType::Legacy,
        chain_id: &[0x01],
        to: &RECIPIENT,
        value: &[0x01],
        data: &[],
    });

    let err = EthTx::from_bytes(&data).unwrap_err();
    assert_eq!(ParserError::from(err), ParserError::InvalidChainId);
}

#[test]
fn erc20_transfer_eip1559_display() {
    let calldata = transfer_calldata(&RECIPIENT, 0x0de0_b6b3_a764_0000);
    let data = build_tx(TxSpec {
        tx_type: EthTxType::Eip1559,
        chain_id: &[0x27, 0x06],
        to: &SUPPORTED_TOKENS[0].address,
        value: &[],
        data: &calldata,
    });

    let (_, tx) = EthTx::from_bytes(&data).unwrap();
    assert!(tx.is_erc20_transfer());
    assert_eq!(tx.num_items().unwrap(), 10);

    assert_eq!(
        item_keys(&tx),
        [
            "Receiver",
            "Contract",
            "Amount",
            "Nonce",
            "Max Priority Fee",
            "Max Fee",
            "Gas limit",
            "Value",
            "Data",
            "Eth-Hash"
        ]
    );

    assert_eq!(
        item_value(&tx, 0),
        "0x8df3845f25ba0ce5a974c30db2f2e24b7c2a1ea4"
    );
    // one token with 18 registered decimals
    assert_eq!(item_value(&tx, 2), "1.000000000000000000 WPEAQ");
    assert_eq!(item_value(&tx, 3), "3");
    // calldata preview is elided past 16 bytes
    assert_eq!(item_value(&tx, 8), "a9059cbb000000000000000000000000...");
}

#[test]
fn erc20_transfer_legacy_has_nine_items() {
    let calldata = transfer_calldata(&RECIPIENT, 1000);
    let data = build_tx(TxSpec {
        tx_type: EthTxType::Legacy,
        chain_id: &[0x0D, 0x0A],
        to: &SUPPORTED_TOKENS[1].address,
        value: &[],
        data: &calldata,
    });

    let (_, tx) = EthTx::from_bytes(&data).unwrap();
    assert!(tx.is_erc20_transfer());
    assert_eq!(tx.num_items().unwrap(), 9);
    assert_eq!(item_value(&tx, 2), "0.001000 USDC");
    assert_eq!(item_key(&tx, 5), "Gas price");
}

#[test]
fn trailing_bytes_after_outer_list() {
    let mut data = build_tx(TxSpec {
        tx_type: EthTxType::Eip1559,
        chain_id: &[0x27, 0x06],
        to: &RECIPIENT,
        value: &[0x01],
        data: &[],
    });
    data.push(0x00);

    let err = EthTx::from_bytes(&data).unwrap_err();
    assert_eq!(ParserError::from(err), ParserError::UnexpectedCharacters);
}

#[test]
fn num_items_matches_renderable_indices() {
    let _guard = EXPERT_GUARD.lock().unwrap_or_else(|e| e.into_inner());
    app_mode::set_expert_mode(true);

    let calldata = transfer_calldata(&RECIPIENT, 55);
    let shapes: Vec<Vec<u8>> = vec![
        // generic transfer, no data
        build_tx(TxSpec {
            tx_type: EthTxType::Eip1559,
            chain_id: &[0x27, 0x06],
            to: &RECIPIENT,
            value: &[0x01],
            data: &[],
        }),
        // contract deployment, no recipient
        build_tx(TxSpec {
            tx_type: EthTxType::Eip2930,
            chain_id: &[0x08, 0xC1],
            to: &[],
            value: &[],
            data: &[0xDE, 0xAD, 0xBE, 0xEF],
        }),
        // generic contract call
        build_tx(TxSpec {
            tx_type: EthTxType::Legacy,
            chain_id: &[0x0D, 0x0A],
            to: &RECIPIENT,
            value: &[0x01],
            data: &[0x01, 0x02],
        }),
        // token transfers over both fee markets
        build_tx(TxSpec {
            tx_type: EthTxType::Eip1559,
            chain_id: &[0x27, 0x06],
            to: &SUPPORTED_TOKENS[0].address,
            value: &[],
            data: &calldata,
        }),
        build_tx(TxSpec {
            tx_type: EthTxType::Eip2930,
            chain_id: &[0x0D, 0x0A],
            to: &SUPPORTED_TOKENS[2].address,
            value: &[],
            data: &calldata,
        }),
    ];

    for data in &shapes {
        let (_, tx) = EthTx::from_bytes(data).unwrap();
        let expected = tx.num_items().unwrap();

        let mut title = [0u8; 32];
        let mut message = [0u8; 256];

        let mut rendered = 0u8;
        loop {
            match tx.render_item(rendered, &mut title, &mut message, 0) {
                Ok(_) => rendered += 1,
                Err(ViewError::NoData) => break,
                Err(e) => panic!("unexpected render error {e:?}"),
            }
        }

        assert_eq!(rendered, expected);
    }

    app_mode::set_expert_mode(false);
}

#[test]
fn generic_review_needs_expert_mode() {
    let data = build_tx(TxSpec {
        tx_type: EthTxType::Eip1559,
        chain_id: &[0x27, 0x06],
        to: &RECIPIENT,
        value: &[0x01],
        data: &[],
    });

    let (_, tx) = EthTx::from_bytes(&data).unwrap();

    let _guard = EXPERT_GUARD.lock().unwrap_or_else(|e| e.into_inner());
    app_mode::set_expert_mode(false);
    let mut title = [0u8; 32];
    let mut message = [0u8; 64];
    assert_eq!(
        tx.render_item(0, &mut title, &mut message, 0),
        Err(ViewError::Reject)
    );
}

#[test]
fn eth_hash_paginates() {
    let data = build_tx(TxSpec {
        tx_type: EthTxType::Eip1559,
        chain_id: &[0x27, 0x06],
        to: &SUPPORTED_TOKENS[0].address,
        value: &[],
        data: &transfer_calldata(&RECIPIENT, 1),
    });

    let (_, tx) = EthTx::from_bytes(&data).unwrap();
    let hash_idx = tx.num_items().unwrap() - 1;

    // 64 hex chars over a 33-byte wide screen
    let mut title = [0u8; 32];
    let mut message = [0u8; 33];
    let pages = tx
        .render_item(hash_idx, &mut title, &mut message, 0)
        .unwrap();
    assert_eq!(pages, 2);

    let mut full = String::new();
    for page in 0..pages {
        tx.render_item(hash_idx, &mut title, &mut message, page)
            .unwrap();
        full.push_str(core::str::from_utf8(&message[..rs_strlen(&message)]).unwrap());
    }
    assert_eq!(full.len(), 64);

    let expected = crate::utils::keccak256(&data);
    assert_eq!(full, hex::encode(expected));

    // past the last page is a caller bug
    assert!(tx
        .render_item(hash_idx, &mut title, &mut message, pages)
        .is_err());
}

#[test]
fn compute_v_typed_and_legacy() {
    let typed = build_tx(TxSpec {
        tx_type: EthTxType::Eip1559,
        chain_id: &[0x27, 0x06],
        to: &RECIPIENT,
        value: &[0x01],
        data: &[],
    });
    let (_, tx) = EthTx::from_bytes(&typed).unwrap();
    assert_eq!(tx.compute_v(0).unwrap(), 0);
    assert_eq!(tx.compute_v(1).unwrap(), 1);

    let pre155 = build_tx(TxSpec {
        tx_type: EthTxType::Legacy,
        chain_id: &[],
        to: &RECIPIENT,
        value: &[0x01],
        data: &[],
    });
    let (_, tx) = EthTx::from_bytes(&pre155).unwrap();
    assert_eq!(tx.compute_v(0).unwrap(), 27);
    assert_eq!(tx.compute_v(1).unwrap(), 28);

    // 35 + parity + 2 * 3338 = 6711 + parity, truncated to a byte
    let eip155 = build_tx(TxSpec {
        tx_type: EthTxType::Legacy,
        chain_id: &[0x0D, 0x0A],
        to: &RECIPIENT,
        value: &[0x01],
        data: &[],
    });
    let (_, tx) = EthTx::from_bytes(&eip155).unwrap();
    assert_eq!(tx.compute_v(0).unwrap(), (6711 % 256) as u8);
    assert_eq!(tx.compute_v(1).unwrap(), (6712 % 256) as u8);
}

#[test]
fn compute_v_parity_step() {
    for chain_id in [&[0x0D, 0x0A][..], &[0x27, 0x06], &[0x08, 0xC1]] {
        let data = build_tx(TxSpec {
            tx_type: EthTxType::Legacy,
            chain_id,
            to: &RECIPIENT,
            value: &[0x01],
            data: &[],
        });
        let (_, tx) = EthTx::from_bytes(&data).unwrap();

        let even = tx.compute_v(0).unwrap();
        let odd = tx.compute_v(1).unwrap();
        assert_eq!(odd.wrapping_sub(even), 1);
    }
}

#[test]
fn erc20_detection_requires_exact_shape() {
    // 67-byte calldata
    let mut short = transfer_calldata(&RECIPIENT, 55);
    short.pop();
    // wrong selector
    let mut wrong_selector = transfer_calldata(&RECIPIENT, 55);
    wrong_selector[0] = 0x23;

    for calldata in [short, wrong_selector] {
        let data = build_tx(TxSpec {
            tx_type: EthTxType::Eip1559,
            chain_id: &[0x27, 0x06],
            to: &SUPPORTED_TOKENS[0].address,
            value: &[],
            data: &calldata,
        });
        let (_, tx) = EthTx::from_bytes(&data).unwrap();
        assert!(!tx.is_erc20_transfer());
    }
}

proptest! {
    // Decoding adversarial input either succeeds after consuming the
    // whole buffer or errors out, it never reads past the end
    #[test]
    fn decode_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        match EthTx::from_bytes(&data) {
            Ok((rem, _)) => prop_assert!(rem.is_empty()),
            Err(_) => {}
        }
    }

    #[test]
    fn decode_never_panics_on_typed(
        tag in 1u8..=2,
        data in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut buf = vec![tag];
        buf.extend(rlp_list(&data));
        let _ = EthTx::from_bytes(&buf);
    }

    // A recognized transfer decodes back to the exact fields that
    // were encoded
    #[test]
    fn transfer_roundtrip(amount in any::<u64>(), recipient in any::<[u8; 20]>()) {
        let calldata = transfer_calldata(&recipient, amount);
        let data = build_tx(TxSpec {
            tx_type: EthTxType::Eip1559,
            chain_id: &[0x27, 0x06],
            to: &SUPPORTED_TOKENS[0].address,
            value: &[],
            data: &calldata,
        });

        let (_, parsed) = EthTransaction::from_bytes(&data).unwrap();
        let transfer = Erc20Transfer::from_tx(&parsed).unwrap();

        prop_assert_eq!(transfer.to().raw_address(), &recipient);
        prop_assert_eq!(
            transfer.value().to_u256(),
            crate::utils::u256::u256::from(amount)
        );
    }
}
