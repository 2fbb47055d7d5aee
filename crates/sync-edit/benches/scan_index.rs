use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sync_edit::{MemoryEditor, SyncEditSession, WordClass, scan, scan_and_index};

const VOCABULARY: &[&str] = &[
    "let", "fn", "value", "count", "index", "self", "return", "match", "Some", "None", "ok",
    "err", "buffer", "len", "i", "j",
];

/// Source-like text drawn from a small vocabulary so that most words repeat.
fn code_like_text(line_count: usize) -> String {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut out = String::with_capacity(line_count * 48);
    for _ in 0..line_count {
        let words = rng.gen_range(3..10);
        for w in 0..words {
            if w > 0 {
                out.push_str(if rng.gen_bool(0.2) { ", " } else { " " });
            }
            out.push_str(VOCABULARY[rng.gen_range(0..VOCABULARY.len())]);
        }
        out.push_str(";\n");
    }
    out.pop();
    out
}

fn bench_scan(c: &mut Criterion) {
    let text = code_like_text(5_000);
    c.bench_function("scan/5k_lines", |b| {
        b.iter(|| black_box(scan(black_box(&text)).len()))
    });
}

fn bench_scan_and_index(c: &mut Criterion) {
    let text = code_like_text(5_000);
    c.bench_function("scan_and_index/5k_lines", |b| {
        b.iter(|| black_box(scan_and_index(black_box(&text), 0, WordClass::Unicode).len()))
    });
}

fn bench_start_and_cycle(c: &mut Criterion) {
    let text = code_like_text(500);
    let len = text.chars().count();
    c.bench_function("session/start_then_next_x10", |b| {
        b.iter_batched(
            || {
                let mut editor = MemoryEditor::new(&text);
                editor.select(0, len);
                editor.take_events();
                editor
            },
            |mut editor| {
                let mut session = SyncEditSession::default();
                session.start(&mut editor).unwrap();
                for _ in 0..10 {
                    session.next(&mut editor).unwrap();
                }
                black_box(session.state().current_index());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_scan, bench_scan_and_index, bench_start_and_cycle);
criterion_main!(benches);
