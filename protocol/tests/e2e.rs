//! End-to-end tests for blob transaction malleation.
//!
//! These tests walk a blob transaction through its whole life: commit,
//! sign, envelope, admission, malleation, placement and rewrap. Every test
//! builds its own signers and working set.

use tessera_protocol::blob::{
    build_wire_tx, extract_wire_payload, ExtractError, MsgPayForBlob, MsgWirePayForBlob,
};
use tessera_protocol::block::Evidence;
use tessera_protocol::config::ChainParams;
use tessera_protocol::crypto::keys::Keypair;
use tessera_protocol::crypto::sha256_array;
use tessera_protocol::proposal::{parse_txs, prepare_proposal, Malleator, PreparedSquare};
use tessera_protocol::shares::{NonInteractiveDefaults, ShareAccounting};
use tessera_protocol::square::min_square_size;
use tessera_protocol::transaction::{
    unwrap_malleated_tx, verify_tx_signature, AnyMsg, BincodeCodec, KeyringSigner, MsgSend, Tx,
    TxBuilder, TxBuilderOption, TxCodec,
};

const CHAIN_ID: &str = "tessera-e2e-1";

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn signer(seed: u8) -> KeyringSigner {
    KeyringSigner::new(Keypair::from_seed(&[seed; 32]), CHAIN_ID, u64::from(seed))
}

fn options() -> Vec<TxBuilderOption> {
    vec![
        TxBuilderOption::GasLimit(120_000),
        TxBuilderOption::FeeAmount(1_500),
        TxBuilderOption::Memo("e2e".to_string()),
    ]
}

/// Builds and encodes a signed wire transaction with a blob of `len` bytes.
fn wire_tx(seed: u8, namespace: [u8; 8], len: usize) -> Vec<u8> {
    let params = ChainParams::mainnet();
    let blob: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(seed)).collect();
    let tx = build_wire_tx(&params, &signer(seed), &namespace, blob, &options()).unwrap();
    BincodeCodec.encode_tx(&tx).unwrap()
}

fn send_tx() -> Vec<u8> {
    let msg = MsgSend {
        from_address: "tess1alice".to_string(),
        to_address: "tess1bob".to_string(),
        amount: 10,
    };
    BincodeCodec
        .encode_tx(&TxBuilder::new().msg(AnyMsg::pack(&msg).unwrap()).build())
        .unwrap()
}

fn malleate(raws: &[Vec<u8>], square_size: usize, evidence: &[Evidence]) -> PreparedSquare {
    let params = ChainParams::mainnet();
    let entries = parse_txs(&BincodeCodec, raws).unwrap();
    Malleator::new(&params, &BincodeCodec, &NonInteractiveDefaults)
        .malleate_and_place(entries, square_size, evidence)
        .unwrap()
}

/// Decodes a rewrapped transaction into its share index and canonical
/// envelope.
fn open_malleated(raw: &[u8]) -> (u32, [u8; 32], Tx) {
    let wrapped = unwrap_malleated_tx(&BincodeCodec, raw).expect("rewrapped transaction");
    let tx = BincodeCodec.decode_tx(&wrapped.tx).unwrap();
    (wrapped.share_index, wrapped.original_tx_hash, tx)
}

// ---------------------------------------------------------------------------
// 1. Three blobs, out of namespace order
// ---------------------------------------------------------------------------

#[test]
fn three_blobs_are_sorted_placed_and_rewrapped() {
    let params = ChainParams::mainnet();
    let raws = vec![
        wire_tx(1, [0x03; 8], 50),
        wire_tx(2, [0x01; 8], 10),
        wire_tx(3, [0x02; 8], 100),
    ];

    let square = malleate(&raws, 4, &[]);
    assert!(square.dropped.is_empty());

    // Blobs come out in namespace order.
    let namespaces: Vec<u8> = square
        .blobs
        .iter()
        .map(|b| b.namespace_id.as_bytes()[0])
        .collect();
    assert_eq!(namespaces, vec![0x01, 0x02, 0x03]);
    let sizes: Vec<usize> = square.blobs.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![10, 100, 50]);

    // Placement recomputed independently from the sorted blobs.
    let counts: Vec<usize> = square
        .blobs
        .iter()
        .map(|b| NonInteractiveDefaults.blob_share_count(&params, b))
        .collect();
    let (_, expected) =
        NonInteractiveDefaults.non_interactive_default_indices(square.compact_shares, 4, &counts);

    // Transactions keep submission order, each tagged with its own blob's index.
    assert_eq!(square.txs.len(), 3);
    let blob_rank_of_tx = [2usize, 0, 1];
    for (slot, raw) in square.txs.iter().enumerate() {
        let (index, original_hash, _) = open_malleated(raw);
        assert_eq!(index, expected[blob_rank_of_tx[slot]], "slot {}", slot);
        assert_eq!(original_hash, sha256_array(&raws[slot]));
    }
}

// ---------------------------------------------------------------------------
// 2. Signature carry-forward
// ---------------------------------------------------------------------------

#[test]
fn malleated_transaction_verifies_with_wire_signature() {
    let params = ChainParams::mainnet();
    let raw = wire_tx(7, [0x42; 8], 3_000);
    let original = BincodeCodec.decode_tx(&raw).unwrap();
    let wire = extract_wire_payload(&original).unwrap();
    wire.validate_basic(&params).unwrap();

    let square = malleate(&[raw], 8, &[]);
    let (_, _, canonical) = open_malleated(&square.txs[0]);

    verify_tx_signature(&canonical, CHAIN_ID).unwrap();
    assert_eq!(canonical.gas_limit(), 120_000);
    assert_eq!(canonical.fee(), 1_500);
    assert_eq!(canonical.memo(), "e2e");
    assert_eq!(canonical.signatures[0], wire.signature());

    let pfb: MsgPayForBlob = canonical.messages()[0].unpack().unwrap();
    assert_eq!(pfb.share_commitment, wire.share_commitment);
    assert_eq!(pfb.blob_size, 3_000);
    assert_eq!(pfb.signer, wire.signer());
}

// ---------------------------------------------------------------------------
// 3. Determinism
// ---------------------------------------------------------------------------

#[test]
fn identical_working_sets_produce_identical_squares() {
    let raws = vec![
        wire_tx(1, [0x09; 8], 700),
        send_tx(),
        wire_tx(2, [0x05; 8], 1_200),
        wire_tx(3, [0x09; 8], 20),
    ];
    let evidence = vec![Evidence(vec![0xEE; 300])];

    let a = malleate(&raws, 8, &evidence);
    let b = malleate(&raws, 8, &evidence);
    assert_eq!(a.txs, b.txs);
    assert_eq!(a.blobs, b.blobs);
    assert_eq!(a.compact_shares, b.compact_shares);
}

// ---------------------------------------------------------------------------
// 4. Dropped entries
// ---------------------------------------------------------------------------

#[test]
fn forged_blob_size_is_dropped_silently() {
    let params = ChainParams::mainnet();
    let codec = BincodeCodec;
    let raws = vec![
        wire_tx(1, [0x11; 8], 40),
        wire_tx(2, [0x12; 8], 40),
        send_tx(),
    ];

    // The forged envelope still decodes; only its declared size lies.
    let mut forged = codec.decode_tx(&raws[1]).unwrap();
    let mut wire: MsgWirePayForBlob = forged.messages()[0].unpack().unwrap();
    wire.blob_size = 4_000;
    forged.body.messages[0] = AnyMsg::pack(&wire).unwrap();
    let raws = vec![raws[0].clone(), codec.encode_tx(&forged).unwrap(), raws[2].clone()];

    let entries = parse_txs(&codec, &raws).unwrap();
    let square = Malleator::new(&params, &codec, &NonInteractiveDefaults)
        .malleate_and_place(entries, 4, &[])
        .unwrap();

    assert_eq!(square.txs.len(), 2);
    assert_eq!(square.blobs.len(), 1);
    assert_eq!(square.dropped.len(), 1);
    assert_eq!(square.dropped[0].slot, 1);
    assert_eq!(square.txs[1], raws[2]);
}

// ---------------------------------------------------------------------------
// 5. Extraction
// ---------------------------------------------------------------------------

#[test]
fn extraction_rejects_ambiguous_envelopes() {
    let raw = wire_tx(4, [0x21; 8], 64);
    let wire_env = BincodeCodec.decode_tx(&raw).unwrap();
    let send_env = BincodeCodec.decode_tx(&send_tx()).unwrap();

    let mut both = send_env.clone();
    both.body.messages.push(wire_env.messages()[0].clone());

    assert_eq!(
        extract_wire_payload(&both),
        Err(ExtractError::MultipleMessagesUnsupported { count: 2 })
    );
    assert_eq!(extract_wire_payload(&send_env), Err(ExtractError::NotFound));
}

#[test]
fn multi_message_blob_envelope_aborts_the_proposal() {
    let params = ChainParams::mainnet();
    let wire_env = BincodeCodec.decode_tx(&wire_tx(4, [0x21; 8], 64)).unwrap();
    let mut both = BincodeCodec.decode_tx(&send_tx()).unwrap();
    both.body.messages.push(wire_env.messages()[0].clone());
    let raws = vec![send_tx(), BincodeCodec.encode_tx(&both).unwrap()];

    assert!(prepare_proposal(&params, &BincodeCodec, &NonInteractiveDefaults, &raws, &[]).is_err());
}

// ---------------------------------------------------------------------------
// 6. Square sizing
// ---------------------------------------------------------------------------

#[test]
fn square_sizing_examples() {
    assert_eq!(min_square_size(1), 1);
    assert_eq!(min_square_size(5), 4);
    assert_eq!(min_square_size(64), 8);
    assert_eq!(min_square_size(65), 16);
}

#[test]
fn prepared_proposal_fits_its_square() {
    let params = ChainParams::mainnet();
    let raws: Vec<Vec<u8>> = (1..=12u8)
        .map(|i| wire_tx(i, [0x10 + i; 8], 300 * i as usize))
        .collect();

    let square =
        prepare_proposal(&params, &BincodeCodec, &NonInteractiveDefaults, &raws, &[]).unwrap();
    assert_eq!(square.txs.len(), 12);

    let last_start = square
        .txs
        .iter()
        .map(|raw| open_malleated(raw).0 as usize)
        .max()
        .unwrap();
    assert!(last_start < square.square_size * square.square_size);
}
