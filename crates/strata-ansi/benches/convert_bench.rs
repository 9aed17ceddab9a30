//! Converter throughput on representative pager input.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use strata_ansi::{EscapeConverter, Pen, SgrCache, parse_sgr};

fn colored_log_line() -> String {
    let mut line = String::new();
    for i in 0..20 {
        line.push_str(&format!(
            "\x1b[3{}m2024-05-01T12:00:{:02}\x1b[0m field{} ",
            (i % 7) + 1,
            i,
            i
        ));
    }
    line
}

fn bench_convert(c: &mut Criterion) {
    let plain = "a plain ascii log line with no escapes at all".repeat(4);
    let colored = colored_log_line();
    let cache = SgrCache::new();

    let mut group = c.benchmark_group("convert");
    group.bench_function("plain_line", |b| {
        b.iter(|| {
            let mut conv = EscapeConverter::new(cache.clone());
            let mut pen = Pen::default();
            let mut emitted = 0usize;
            for ch in plain.chars() {
                if !conv.convert(black_box(ch), &mut pen) {
                    emitted += 1;
                }
            }
            black_box(emitted)
        });
    });
    group.bench_function("colored_line", |b| {
        b.iter(|| {
            let mut conv = EscapeConverter::new(cache.clone());
            let mut pen = Pen::default();
            let mut emitted = 0usize;
            for ch in colored.chars() {
                if !conv.convert(black_box(ch), &mut pen) {
                    emitted += 1;
                }
            }
            black_box(emitted)
        });
    });
    group.finish();
}

fn bench_sgr_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("sgr");
    group.bench_function("parse_extended", |b| {
        b.iter(|| parse_sgr(black_box("1;38;2;120;80;200;48;5;236")));
    });
    group.bench_function("cache_hit", |b| {
        let cache = SgrCache::new();
        let _ = cache.get_or_parse("1;38;2;120;80;200;48;5;236");
        b.iter(|| cache.get_or_parse(black_box("1;38;2;120;80;200;48;5;236")));
    });
    group.finish();
}

criterion_group!(benches, bench_convert, bench_sgr_parse);
criterion_main!(benches);
