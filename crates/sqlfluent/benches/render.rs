use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlfluent::Composer;

/// Build a SELECT with `n` filter pairs:
/// SELECT * FROM t WHERE col0 = ? AND col1 = ? ... ORDER BY id LIMIT 0,20
fn build_select(n: usize) -> Composer {
    let mut q = Composer::new();
    q.limit(0, 20).order_by("id").from("t").select("*");
    for i in 0..n {
        let column = format!("col{i}");
        if i == 0 {
            q.where_(&column);
        } else {
            q.and(&column);
        }
        q.eq("?");
    }
    q
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("composer/render");

    for n in [1, 5, 10, 50, 100] {
        let q = build_select(n);
        group.bench_with_input(BenchmarkId::new("direct", n), &q, |b, q| {
            b.iter(|| black_box(q.render(false)));
        });
        group.bench_with_input(BenchmarkId::new("prepared", n), &q, |b, q| {
            b.iter(|| black_box(q.render(true)));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("composer/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let q = build_select(n);
                black_box(q.render(true));
            });
        });
    }

    group.finish();
}

fn bench_guarded_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("composer/guarded_filters");

    for n in [10, 100, 1000] {
        let operands: Vec<String> = (0..n)
            .map(|i| if i % 2 == 0 { format!("v{i}") } else { format!("{i}>0") })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &operands, |b, operands| {
            b.iter(|| {
                let mut q = Composer::new();
                q.select("*").from("t").where_("id").eq("1");
                for operand in operands {
                    q.or("name").eq(operand);
                }
                black_box(q.render(false));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render, bench_build_and_render, bench_guarded_filters);
criterion_main!(benches);
