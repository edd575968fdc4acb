//! Screen and terminal benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use pocketterm_core::core::Screen;
use pocketterm_core::Terminal;

fn bench_screen_print(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    let text = "Hello, World! ".repeat(100);

    group.bench_function("print_chars", |b| {
        b.iter(|| {
            let mut screen = Screen::new(80, 24, 1000);
            for ch in text.chars() {
                screen.print(ch);
            }
            black_box(screen)
        })
    });

    group.finish();
}

fn bench_terminal_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    let input: String = (0..1000)
        .map(|i| format!("Line {i}: Some text content here\r\n"))
        .collect();
    group.throughput(Throughput::Bytes(input.len() as u64));

    // Every line past the 24th evicts a row into scrollback
    group.bench_function("scroll_into_scrollback", |b| {
        b.iter(|| {
            let mut term = Terminal::new(80, 24, 500);
            term.append(black_box(input.as_bytes()));
            black_box(term)
        })
    });

    group.finish();
}

fn bench_terminal_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    let input = "Hello, World!\r\n".repeat(200);

    group.bench_function("resize", |b| {
        b.iter(|| {
            let mut term = Terminal::new(80, 24, 500);
            term.append(input.as_bytes());
            term.resize(120, 40);
            term.resize(40, 10);
            term.resize(132, 50);
            black_box(term)
        })
    });

    group.finish();
}

fn bench_terminal_full_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    // Simulate a full screen redraw (like vim opening)
    let mut input = String::from("\x1b[?1049h");
    for row in 1..=24 {
        input.push_str(&format!("\x1b[{row};1H\x1b[3{}m", row % 8));
        input.push_str(&"X".repeat(80));
    }
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("full_redraw", |b| {
        b.iter(|| {
            let mut term = Terminal::new(80, 24, 500);
            term.append(black_box(input.as_bytes()));
            black_box(term)
        })
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    let mut term = Terminal::new(80, 24, 500);
    for i in 0..600 {
        term.append(format!("\x1b[3{}mrow {i}\x1b[0m plain text after it\r\n", i % 8).as_bytes());
    }

    group.bench_function("snapshot_visible", |b| {
        b.iter(|| black_box(term.snapshot(false)))
    });
    group.bench_function("snapshot_with_scrollback", |b| {
        b.iter(|| black_box(term.snapshot(true)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_screen_print,
    bench_terminal_scroll,
    bench_terminal_resize,
    bench_terminal_full_redraw,
    bench_snapshot
);

criterion_main!(benches);
