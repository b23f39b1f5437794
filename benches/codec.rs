use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use futhark_data::{from_slice, from_str, load_slice, to_string, to_vec, Value};
use ndarray::{Array1, Array2};

fn vector_f64(n: usize) -> Value {
    Value::from(Array1::from_shape_fn(n, |i| i as f64 * 0.5).into_dyn())
}

fn matrix_i32(n: usize) -> Value {
    Value::from(Array2::from_shape_fn((n, n), |(i, j)| (i * n + j) as i32 - 500).into_dyn())
}

fn benchmark_encode_text(c: &mut Criterion) {
    let value = matrix_i32(100);

    c.bench_function("encode_text_matrix", |b| {
        b.iter(|| to_string(black_box(&value)))
    });
}

fn benchmark_encode_binary(c: &mut Criterion) {
    let value = matrix_i32(100);

    c.bench_function("encode_binary_matrix", |b| {
        b.iter(|| to_vec(black_box(&value)).unwrap())
    });
}

fn benchmark_decode_text(c: &mut Criterion) {
    let text = to_string(&matrix_i32(100));

    c.bench_function("decode_text_matrix", |b| {
        b.iter(|| from_str(black_box(&text)).unwrap())
    });
}

fn benchmark_decode_binary(c: &mut Criterion) {
    let bytes = to_vec(&matrix_i32(100)).unwrap();

    c.bench_function("decode_binary_matrix", |b| {
        b.iter(|| from_slice(black_box(&bytes)).unwrap())
    });
}

fn benchmark_scalar_stream(c: &mut Criterion) {
    let input: String = (0..1000).map(|i| format!("{}i64 -- row\n", i)).collect();

    c.bench_function("decode_scalar_stream", |b| {
        b.iter(|| load_slice(black_box(input.as_bytes())).count())
    });
}

fn benchmark_vector_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_sizes");

    for size in [10, 100, 1000, 10000].iter() {
        let value = vector_f64(*size);
        let text = to_string(&value);
        let bytes = to_vec(&value).unwrap();

        group.bench_with_input(BenchmarkId::new("text", size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("binary", size), &bytes, |b, bytes| {
            b.iter(|| from_slice(black_box(bytes)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_encode_text,
    benchmark_encode_binary,
    benchmark_decode_text,
    benchmark_decode_binary,
    benchmark_scalar_stream,
    benchmark_vector_sizes
);
criterion_main!(benches);
