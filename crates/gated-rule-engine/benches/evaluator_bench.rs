//! 文本评估器性能基准测试
//!
//! 针对各类谓词背后的字符串分析函数进行细粒度的性能测试。

use chrono::{FixedOffset, TimeZone};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rule_engine::compiler::CompiledPredicate;
use rule_engine::evaluator::TextEvaluator;
use rule_engine::{CharClass, Predicate, PredicateSpec, Timestamp};
use std::hint::black_box;

fn now() -> Timestamp {
    FixedOffset::east_opt(4 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 11, 20, 14, 5, 0)
        .unwrap()
}

/// 构造指定长度的混合文本（字母、数字、符号、emoji）
fn mixed_text(len: usize) -> String {
    "Bakı1!Azərbaycan😀Xəzər🎉aei"
        .chars()
        .cycle()
        .take(len)
        .collect()
}

/// 字符类别计数基准
fn bench_class_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("class_counts");

    for len in [64, 512, 4096] {
        let text = mixed_text(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("emoji", len), &text, |b, text| {
            b.iter(|| TextEvaluator::count_class(black_box(text), CharClass::Emoji))
        });

        group.bench_with_input(BenchmarkId::new("distinct_uppercase", len), &text, |b, text| {
            b.iter(|| TextEvaluator::distinct_count(black_box(text), CharClass::Uppercase))
        });

        group.bench_with_input(BenchmarkId::new("vowel_run", len), &text, |b, text| {
            b.iter(|| TextEvaluator::longest_run(black_box(text), CharClass::Vowel))
        });
    }

    group.finish();
}

/// 回文计数基准
fn bench_palindromes(c: &mut Criterion) {
    let mut group = c.benchmark_group("palindromes");

    for len in [64, 512, 4096] {
        let text = mixed_text(len);
        let repeated = "x".repeat(len);

        group.bench_with_input(BenchmarkId::new("mixed", len), &text, |b, text| {
            b.iter(|| TextEvaluator::palindrome_count(black_box(text), 3, 3))
        });

        // 全相同字符是最坏情况，由 cap 截断
        group.bench_with_input(BenchmarkId::new("uniform", len), &repeated, |b, text| {
            b.iter(|| TextEvaluator::palindrome_count(black_box(text), 3, 3))
        });
    }

    group.finish();
}

/// 编译后谓词基准
fn bench_compiled_predicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("compiled_predicates");
    let now = now();
    let text = mixed_text(1024);

    let cases = [
        ("min_length", PredicateSpec::MinLength { min: 810 }),
        (
            "contains_any",
            PredicateSpec::ContainsAny {
                words: ["yanvar", "fevral", "mart", "aprel", "may", "iyun"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                ignore_case: true,
            },
        ),
        (
            "repeated_digit",
            PredicateSpec::RepeatedChar {
                min: 2,
                class: Some(CharClass::Digit),
            },
        ),
        ("today_date", PredicateSpec::TodayDate),
        ("current_time", PredicateSpec::CurrentTime),
    ];

    for (name, spec) in cases {
        let predicate = CompiledPredicate::compile(spec).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| predicate.check(black_box(&text), black_box(&now)))
        });
    }

    group.finish();
}

// 配置 criterion
criterion_group!(
    benches,
    bench_class_counts,
    bench_palindromes,
    bench_compiled_predicates,
);

criterion_main!(benches);
