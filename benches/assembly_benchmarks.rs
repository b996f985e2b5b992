use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use talentgraph::{Category, Employee, GraphAssembler, LabelNormalizer};

const SKILLS: &[&str] = &["AWS", "Amazon Web Services", "K8s", "Rust", "Go", "Golang", "ML", "React"];
const VALUES: &[&str] = &["自己成長", "成長", "誠実さ", "チームワーク", "顧客志向"];
const INTERESTS: &[&str] = &["生成AI", "GenAI", "データ基盤", "SRE", "デザイン"];

fn synthetic_staff(size: usize) -> Vec<Employee> {
    (0..size)
        .map(|i| {
            Employee::new(format!("Employee{}", i))
                .with_attributes(
                    Category::Skill,
                    [SKILLS[i % SKILLS.len()], SKILLS[(i * 3 + 1) % SKILLS.len()]],
                )
                .with_attributes(Category::Value, [VALUES[i % VALUES.len()]])
                .with_attributes(
                    Category::Interest,
                    [INTERESTS[(i / 2) % INTERESTS.len()]],
                )
        })
        .collect()
}

/// Full phase 1 assembly; dominated by the O(n²) pairwise overlap pass
fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    let normalizer = LabelNormalizer::new();

    for size in [50, 200, 500].iter() {
        let records = synthetic_staff(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| GraphAssembler::new(&normalizer).assemble(records));
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let normalizer = LabelNormalizer::new();
    let labels: Vec<String> = SKILLS
        .iter()
        .chain(VALUES)
        .chain(INTERESTS)
        .map(|s| s.to_string())
        .collect();

    c.bench_function("canonical_set", |b| {
        b.iter(|| normalizer.canonical_set(&labels));
    });
    c.bench_function("normalize_for_id", |b| {
        b.iter(|| {
            for label in &labels {
                criterion::black_box(normalizer.normalize_for_id(label));
            }
        });
    });
}

criterion_group!(benches, bench_assemble, bench_normalize);
criterion_main!(benches);
