use criterion::{black_box, criterion_group, criterion_main, Criterion};

use satprop::tle::TwoLineElement;

const ISS_TLE_1: &str = "1 25544U 98067A   22071.78032407  .00021395  00000-0  39008-3 0  9996";
const ISS_TLE_2: &str = "2 25544  51.6424  94.0370 0004047 256.5103  89.8846 15.49386383330227";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_tle/iss", |b| {
        b.iter(|| TwoLineElement::parse(black_box(ISS_TLE_1), black_box(ISS_TLE_2)))
    });

    // rejected at the last stage, after every field was scanned
    let bad_checksum = ISS_TLE_1.replace("9996", "9990");
    c.bench_function("parse_tle/checksum_mismatch", |b| {
        b.iter(|| TwoLineElement::parse(black_box(&bad_checksum), black_box(ISS_TLE_2)))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse
);
criterion_main!(benches);
