// Malleation pipeline benchmarks.
//
// Covers parsing, malleate-and-place and the full proposal pass over
// working sets of signed wire transactions.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tessera_protocol::blob::build_wire_tx;
use tessera_protocol::config::ChainParams;
use tessera_protocol::crypto::keys::Keypair;
use tessera_protocol::proposal::{parse_txs, prepare_proposal, Malleator};
use tessera_protocol::shares::NonInteractiveDefaults;
use tessera_protocol::transaction::{BincodeCodec, KeyringSigner, TxCodec};

/// `n` encoded wire transactions with rotating namespaces and blob sizes.
fn working_set(n: usize) -> Vec<Vec<u8>> {
    let params = ChainParams::mainnet();
    let signer = KeyringSigner::new(Keypair::from_seed(&[7; 32]), params.chain_id.clone(), 0);
    (0..n)
        .map(|i| {
            let ns = [0x10 + (i % 200) as u8; 8];
            let blob = vec![i as u8; 200 + (i * 37) % 3_000];
            let tx = build_wire_tx(&params, &signer, &ns, blob, &[]).unwrap();
            BincodeCodec.encode_tx(&tx).unwrap()
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let raws = working_set(256);

    c.bench_function("pipeline/parse_256", |b| {
        b.iter(|| parse_txs(&BincodeCodec, &raws).unwrap());
    });
}

fn bench_malleate_and_place(c: &mut Criterion) {
    let params = ChainParams::mainnet();
    let malleator = Malleator::new(&params, &BincodeCodec, &NonInteractiveDefaults);
    let mut group = c.benchmark_group("pipeline/malleate_and_place");

    for n in [16usize, 64, 256] {
        let entries = parse_txs(&BincodeCodec, &working_set(n)).unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &entries, |b, entries| {
            b.iter_with_setup(
                || entries.clone(),
                |entries| malleator.malleate_and_place(entries, 128, &[]).unwrap(),
            );
        });
    }

    group.finish();
}

fn bench_prepare_proposal(c: &mut Criterion) {
    let params = ChainParams::mainnet();
    let raws = working_set(128);

    c.bench_function("pipeline/prepare_proposal_128", |b| {
        b.iter(|| {
            prepare_proposal(&params, &BincodeCodec, &NonInteractiveDefaults, &raws, &[]).unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_malleate_and_place,
    bench_prepare_proposal,
);
criterion_main!(benches);
