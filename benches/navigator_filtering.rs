use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use log_filters::{Entries, NavigatorItem, NucleoOracle};

struct Row {
    uuid: String,
    label: String,
}

impl NavigatorItem for Row {
    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

/// Generate filter-like labels with varied words
fn generate_rows(count: usize, offset: usize) -> Vec<Row> {
    let words = [
        "error", "timeout", "connection", "refused", "warning", "retry", "deadlock", "panic",
        "overflow", "denied", "checksum", "latency", "shutdown",
    ];

    (0..count)
        .map(|i| {
            let n = i + offset;
            Row {
                uuid: format!("row-{n}"),
                label: format!("{} {} worker-{}", words[n % words.len()], words[(n / 7) % words.len()], n),
            }
        })
        .collect()
}

fn bench_navigator_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigator_filtering");

    for size in [100, 1_000, 10_000].iter() {
        let mut entries = Entries::new(Box::new(NucleoOracle::new()));
        entries.add(0, "Filters", generate_rows(size * 3 / 4, 0));
        entries.add(1, "Disabled", generate_rows(size / 4, size * 3 / 4));

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("query", size), size, |b, _| {
            b.iter(|| {
                entries.filtering(black_box("tmout"));
                entries.all().len()
            });
        });
        group.bench_with_input(BenchmarkId::new("blank", size), size, |b, _| {
            b.iter(|| {
                entries.filtering(black_box(""));
                entries.all().len()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_navigator_filtering);
criterion_main!(benches);
