//! 集成测试共用的候选字符串构造器
//!
//! 目录中所有内置谓词在追加字符时都是单调的：
//! 已满足的规则不会因为在末尾追加字符而失效。
//! 因此只需按顺序为每条未满足的规则追加一段见证字符串。

#![allow(dead_code)]

use chrono::{FixedOffset, TimeZone};
use rule_engine::evaluator::TextEvaluator;
use rule_engine::{Catalog, CharClass, PredicateSpec, Timestamp};

/// 巴库时间 2024-11-20 的某个时刻
pub fn baku(h: u32, m: u32, s: u32) -> Timestamp {
    FixedOffset::east_opt(4 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 11, 20, h, m, s)
        .unwrap()
}

/// 某类别内可用于构造见证的字符
fn universe(class: CharClass) -> Vec<char> {
    match class {
        CharClass::Digit => "0123456789".chars().collect(),
        CharClass::Uppercase => "ABCDEFGHJKLMNOPQRSTUVWXYZÇĞÖŞÜ".chars().collect(),
        CharClass::Lowercase => "abcdefghjklmnopqrstuvwxyzçğöşü".chars().collect(),
        CharClass::Special => "!@#$%^&*()_+-=[]{};:,.<>/?".chars().collect(),
        CharClass::Roman => "IVXLCDM".chars().collect(),
        CharClass::Vowel => "aeiouəıöü".chars().collect(),
        CharClass::Emoji => (0x1F600..=0x1F64F).filter_map(char::from_u32).collect(),
    }
}

fn witness(spec: &PredicateSpec, candidate: &str, now: &Timestamp) -> String {
    match spec {
        PredicateSpec::MinLength { min } => {
            "z".repeat(min.saturating_sub(TextEvaluator::char_len(candidate)))
        }
        PredicateSpec::MinCount { class, min } => {
            let have = TextEvaluator::count_class(candidate, *class);
            universe(*class)[0]
                .to_string()
                .repeat(min.saturating_sub(have))
        }
        PredicateSpec::MinDistinct { class, min } => {
            let need = min.saturating_sub(TextEvaluator::distinct_count(candidate, *class));
            universe(*class)
                .into_iter()
                .filter(|c| !candidate.contains(*c))
                .take(need)
                .collect()
        }
        PredicateSpec::ContainsText { text } => text.clone(),
        PredicateSpec::ContainsAll { texts } => texts.join(" "),
        PredicateSpec::ContainsAny { words, .. } => words[0].clone(),
        PredicateSpec::ClassRun { class, length } => {
            universe(*class)[0].to_string().repeat(*length)
        }
        PredicateSpec::RepeatedChar { min, class } => {
            let c = class.map(|c| universe(c)[0]).unwrap_or('z');
            c.to_string().repeat(*min)
        }
        PredicateSpec::Palindromes {
            min_length,
            min_count,
        } => "x".repeat(min_length + min_count),
        PredicateSpec::TodayDate => TextEvaluator::date_stamp(now),
        PredicateSpec::CurrentTime => TextEvaluator::time_stamp(now),
        PredicateSpec::Always => String::new(),
    }
}

/// 构造满足 ID 不大于 `upto` 的所有规则的候选字符串
pub fn winning_prefix(catalog: &Catalog, now: &Timestamp, upto: u32) -> String {
    let mut candidate = String::new();

    for rule in catalog.iter().take_while(|r| r.id <= upto) {
        if rule.predicate().check(&candidate, now).unwrap() {
            continue;
        }

        let spec = rule.spec().expect("reference rules are data-defined");
        candidate.push(' ');
        candidate.push_str(&witness(spec, &candidate, now));

        assert!(
            rule.predicate().check(&candidate, now).unwrap(),
            "witness for rule {} ({}) did not satisfy it",
            rule.id,
            spec
        );
    }

    candidate
}

/// 构造满足整个目录的候选字符串
pub fn winning_candidate(catalog: &Catalog, now: &Timestamp) -> String {
    winning_prefix(catalog, now, u32::MAX)
}
