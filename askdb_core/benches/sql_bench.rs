use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use askdb_core::{QueryExtractor, QueryValidator};

fn extract_fenced_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_fenced");

    let short = "```sql\nSELECT name FROM players LIMIT 5;\n```";
    let chatty = format!(
        "{}\n```sql\nSELECT passer_player_name, SUM(passing_yards) AS yards\nFROM plays\nWHERE season = 2024\nGROUP BY passer_player_name\nORDER BY yards DESC\nLIMIT 10;\n```\n{}",
        "Sure! Here is a query that answers your question. ".repeat(20),
        "Let me know if you need anything else. ".repeat(20)
    );

    group.bench_function("short", |b| {
        b.iter(|| {
            black_box(QueryExtractor::extract(black_box(short)));
        });
    });

    group.bench_function("chatty", |b| {
        b.iter(|| {
            black_box(QueryExtractor::extract(black_box(&chatty)));
        });
    });

    group.finish();
}

fn extract_line_scan_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_line_scan");

    // Prose lines before the statement, no fence
    for lines in [1, 10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*lines as u64));

        let mut response = String::new();
        for i in 0..*lines {
            response.push_str(&format!("Line {} of explanation about the data.\n", i));
        }
        response.push_str("SELECT team, COUNT(*)\nFROM plays\nGROUP BY team;\n");

        group.bench_with_input(
            BenchmarkId::new("prose_then_select", lines),
            &response,
            |b, response| {
                b.iter(|| {
                    black_box(QueryExtractor::extract(response));
                });
            },
        );
    }

    group.finish();
}

fn validate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    for columns in [1, 10, 100].iter() {
        let projection: Vec<String> = (0..*columns).map(|i| format!("col_{}", i)).collect();
        let sql = format!("SELECT {} FROM plays WHERE season = 2024 LIMIT 10;", projection.join(", "));

        group.bench_with_input(BenchmarkId::new("accepted", columns), &sql, |b, sql| {
            b.iter(|| {
                black_box(QueryValidator::validate(sql));
            });
        });
    }

    group.bench_function("rejected_denylist", |b| {
        b.iter(|| {
            black_box(QueryValidator::validate(black_box(
                "SELECT * FROM users; DROP TABLE users;",
            )));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    extract_fenced_benchmark,
    extract_line_scan_benchmark,
    validate_benchmark
);
criterion_main!(benches);
