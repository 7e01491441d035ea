use criterion::{black_box, criterion_group, criterion_main, Criterion};
use matrix::{HowardOptions, MaxPlus, MaxPlusMatrix};

/// A strongly connected matrix with non-positive weights
fn sample(n: usize) -> MaxPlusMatrix {
    let data = (0..n * n)
        .map(|k| {
            let (i, j) = (k / n, k % n);
            if j == (i + 1) % n || (i * 5 + j) % 4 == 0 {
                MaxPlus::from(-(((i * 7 + j * 3) % 11) as i32) - 1)
            } else {
                MaxPlus::default()
            }
        })
        .collect();
    MaxPlusMatrix::from_data(n, n, data)
}

pub fn star(c: &mut Criterion) {
    let this = black_box(sample(40));

    c.bench_function("star", |b| b.iter(|| this.star().unwrap()));
}

pub fn howard(c: &mut Criterion) {
    let this = black_box(sample(40));
    let options = HowardOptions::default();

    c.bench_function("howard", |b| b.iter(|| this.howard(&options).unwrap()));
}

criterion_group!(benches, star, howard);
criterion_main!(benches);
