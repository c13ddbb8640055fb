//! Feed Benchmarks — Append Path Performance
//!
//! Benchmarks the hot path that runs on every pushed message and on
//! history loads.
//!
//! Run with: cargo bench --bench feed_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use peerconnect_client::domain::{Feed, Message};

fn sample_messages(n: usize) -> Vec<Message> {
    (0..n)
        .map(|i| Message::received_now(format!("user{}", i % 8), format!("message {i}")))
        .collect()
}

/// Benchmark a single live append.
fn bench_single_append(c: &mut Criterion) {
    let message = Message::received_now("alice", "hello there");

    c.bench_function("feed_append_one", |b| {
        b.iter(|| {
            let mut feed = Feed::new();
            feed.append(black_box(message.clone()));
        });
    });
}

/// Benchmark a 1000-message history load.
fn bench_history_load(c: &mut Criterion) {
    let history = sample_messages(1000);

    c.bench_function("feed_extend_1000", |b| {
        b.iter(|| {
            let mut feed = Feed::new();
            feed.extend(black_box(history.clone()));
        });
    });
}

/// Benchmark render formatting of a message line.
fn bench_render_line(c: &mut Criterion) {
    let message = Message::received_now("alice", "hello there");

    c.bench_function("message_display", |b| {
        b.iter(|| {
            let _line = black_box(&message).to_string();
        });
    });
}

criterion_group!(
    benches,
    bench_single_append,
    bench_history_load,
    bench_render_line
);
criterion_main!(benches);
