//! 顺序门控执行器
//!
//! 自左向右单遍扫描目录：上一条规则满足时下一条规则才激活，
//! 未激活的规则不执行谓词。谓词故障（返回错误或 panic）只影响该规则本身。

use crate::catalog::Catalog;
use crate::evaluator::TextEvaluator;
use crate::models::{EvaluationReport, EvaluationSummary, Rule, RuleState, Timestamp};
use pgame_shared::observability::metrics::record_predicate_fault;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, warn};

/// 门控执行器
#[derive(Debug, Clone, Default)]
pub struct GateExecutor {
    /// 是否记录逐条评估追踪
    trace_enabled: bool,
}

impl GateExecutor {
    pub fn new() -> Self {
        Self {
            trace_enabled: false,
        }
    }

    /// 启用评估追踪
    pub fn with_trace(mut self) -> Self {
        self.trace_enabled = true;
        self
    }

    /// 执行一次完整的评估
    ///
    /// 结果只由 `(catalog, candidate, now)` 决定，可以重复调用。
    pub fn evaluate(&self, catalog: &Catalog, candidate: &str, now: &Timestamp) -> EvaluationReport {
        let start = Instant::now();

        debug_assert!(catalog.rules().windows(2).all(|w| w[0].id < w[1].id));

        let mut rules = Vec::with_capacity(catalog.len());
        let mut trace = Vec::new();
        let mut summary = EvaluationSummary {
            total_rule_count: catalog.len(),
            ..Default::default()
        };

        // 门控累加器：第一条规则总是激活
        let mut gate = true;

        for rule in catalog.iter() {
            let active = gate;
            let satisfied = active && self.check_rule(rule, candidate, now);

            if self.trace_enabled {
                trace.push(if active {
                    format!(
                        "rule {}: ACTIVE => {}",
                        rule.id,
                        if satisfied { "SATISFIED" } else { "NOT_SATISFIED" }
                    )
                } else {
                    format!("rule {}: LOCKED", rule.id)
                });
            }

            if active {
                summary.active_count += 1;
            }
            if satisfied {
                summary.satisfied_count += 1;
            }

            rules.push(RuleState {
                id: rule.id,
                text: rule.text.clone(),
                category: rule.category.clone(),
                active,
                satisfied,
            });

            gate = satisfied;
        }

        // 终止规则满足即通关
        summary.is_complete = rules.last().is_some_and(|r| r.satisfied);

        let report = EvaluationReport {
            rules,
            summary,
            candidate_length: TextEvaluator::char_len(candidate),
            evaluated_at: *now,
            evaluation_trace: trace,
            evaluation_time_us: start.elapsed().as_micros() as u64,
        };

        debug!(
            active = report.summary.active_count,
            satisfied = report.summary.satisfied_count,
            complete = report.summary.is_complete,
            elapsed_us = report.evaluation_time_us,
            "evaluation pass finished"
        );

        report
    }

    /// 执行单条规则的谓词，故障视为未满足
    fn check_rule(&self, rule: &Rule, candidate: &str, now: &Timestamp) -> bool {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            rule.predicate().check(candidate, now)
        }));

        match outcome {
            Ok(Ok(satisfied)) => satisfied,
            Ok(Err(e)) => {
                warn!(rule_id = rule.id, error = %e, "predicate fault, treating rule as not satisfied");
                record_predicate_fault(rule.id);
                false
            }
            Err(_) => {
                warn!(rule_id = rule.id, "predicate panicked, treating rule as not satisfied");
                record_predicate_fault(rule.id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, RuleError};
    use crate::models::RuleStatus;
    use crate::predicates::Predicate;
    use chrono::{FixedOffset, TimeZone};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn now() -> Timestamp {
        FixedOffset::east_opt(4 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 11, 20, 14, 5, 0)
            .unwrap()
    }

    /// 候选字符串包含指定字符即满足
    struct HasChar(char);

    impl Predicate for HasChar {
        fn check(&self, candidate: &str, _now: &Timestamp) -> Result<bool> {
            Ok(candidate.contains(self.0))
        }
    }

    struct Failing;

    impl Predicate for Failing {
        fn check(&self, _candidate: &str, _now: &Timestamp) -> Result<bool> {
            Err(RuleError::PredicateFault("boom".to_string()))
        }
    }

    struct Panicking;

    impl Predicate for Panicking {
        fn check(&self, _candidate: &str, _now: &Timestamp) -> Result<bool> {
            panic!("predicate exploded")
        }
    }

    /// 记录调用次数
    struct Counting(Arc<AtomicUsize>);

    impl Predicate for Counting {
        fn check(&self, _candidate: &str, _now: &Timestamp) -> Result<bool> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    /// 规则 i 要求包含第 i 个字母（a, b, c, ...）
    fn letter_catalog(n: u32) -> Catalog {
        let mut builder = Catalog::builder();
        for i in 0..n {
            let c = char::from(b'a' + i as u8);
            builder = builder.rule(i + 1, format!("contains {}", c), "test", HasChar(c));
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_empty_candidate_only_first_rule_active() {
        let catalog = letter_catalog(5);
        let report = GateExecutor::new().evaluate(&catalog, "", &now());

        assert_eq!(report.rules[0].status(), RuleStatus::ActiveUnsatisfied);
        assert!(report.rules[1..].iter().all(|r| !r.active && !r.satisfied));
        assert_eq!(report.summary.active_count, 1);
        assert_eq!(report.summary.satisfied_count, 0);
        assert_eq!(report.summary.total_rule_count, 5);
        assert!(!report.summary.is_complete);
    }

    #[test]
    fn test_gate_follows_previous_rule() {
        let catalog = letter_catalog(6);
        let executor = GateExecutor::new();

        for candidate in ["", "a", "ab", "abd", "bcd", "abcdef", "fedcba", "abce"] {
            let report = executor.evaluate(&catalog, candidate, &now());

            for (i, rule) in report.rules.iter().enumerate() {
                let expected_active = i == 0 || report.rules[i - 1].satisfied;
                assert_eq!(rule.active, expected_active, "candidate {candidate:?}, rule {i}");
                if !rule.active {
                    assert!(!rule.satisfied);
                }
            }

            // 一旦某条规则未满足，其后没有规则处于激活状态
            if let Some(pos) = report.rules.iter().position(|r| !r.satisfied) {
                assert!(report.rules[pos + 1..].iter().all(|r| !r.active));
            }
        }
    }

    #[test]
    fn test_locked_rules_keep_order_and_text() {
        let catalog = letter_catalog(4);
        let report = GateExecutor::new().evaluate(&catalog, "a", &now());

        let ids: Vec<u32> = report.rules.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(report.rules[3].text, "contains d");
        assert_eq!(report.rules[3].status(), RuleStatus::Locked);
    }

    #[test]
    fn test_complete_when_terminal_satisfied() {
        let catalog = letter_catalog(3);
        let report = GateExecutor::new().evaluate(&catalog, "cab", &now());

        assert!(report.summary.is_complete);
        assert_eq!(report.summary.satisfied_count, 3);
        assert_eq!(report.summary.active_count, 3);
    }

    #[test]
    fn test_error_fault_isolated() {
        let catalog = Catalog::builder()
            .rule(1, "a", "t", HasChar('a'))
            .rule(2, "fails", "t", Failing)
            .rule(3, "c", "t", HasChar('c'))
            .build()
            .unwrap();

        let report = GateExecutor::new().evaluate(&catalog, "ac", &now());

        assert!(report.rules[0].satisfied);
        assert!(report.rules[1].active);
        assert!(!report.rules[1].satisfied);
        assert!(!report.rules[2].active);
        assert_eq!(report.summary.satisfied_count, 1);
    }

    #[test]
    fn test_panic_fault_isolated() {
        let catalog = Catalog::builder()
            .rule(1, "a", "t", HasChar('a'))
            .rule(2, "b", "t", HasChar('b'))
            .rule(3, "panics", "t", Panicking)
            .build()
            .unwrap();

        let report = GateExecutor::new().evaluate(&catalog, "ab", &now());

        assert!(report.rules[0].satisfied);
        assert!(report.rules[1].satisfied);
        assert_eq!(report.rules[2].status(), RuleStatus::ActiveUnsatisfied);
        assert_eq!(report.summary.total_rule_count, 3);
    }

    #[test]
    fn test_locked_predicates_not_executed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let catalog = Catalog::builder()
            .rule(1, "a", "t", HasChar('a'))
            .rule(2, "counted", "t", Counting(calls.clone()))
            .build()
            .unwrap();

        GateExecutor::new().evaluate(&catalog, "", &now());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        GateExecutor::new().evaluate(&catalog, "a", &now());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_deterministic() {
        let catalog = letter_catalog(5);
        let executor = GateExecutor::new();

        let first = executor.evaluate(&catalog, "abx", &now());
        let second = executor.evaluate(&catalog, "abx", &now());

        assert!(first.same_outcome(&second));
        assert_eq!(first.summary, second.summary);
    }

    #[test]
    fn test_trace_output() {
        let catalog = letter_catalog(3);
        let report = GateExecutor::new()
            .with_trace()
            .evaluate(&catalog, "a", &now());

        assert_eq!(
            report.evaluation_trace,
            vec![
                "rule 1: ACTIVE => SATISFIED",
                "rule 2: ACTIVE => NOT_SATISFIED",
                "rule 3: LOCKED",
            ]
        );

        let report = GateExecutor::new().evaluate(&catalog, "a", &now());
        assert!(report.evaluation_trace.is_empty());
    }

    #[test]
    fn test_candidate_length_in_chars() {
        let catalog = letter_catalog(1);
        let report = GateExecutor::new().evaluate(&catalog, "Bakı😀", &now());
        assert_eq!(report.candidate_length, 5);
    }
}
