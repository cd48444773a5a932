//! 游戏会话
//!
//! 承接表现层的两类外部刺激（候选字符串变化、时钟 tick），
//! 每次都从头完整重算一遍评估结果，不缓存单条规则的状态。

use crate::catalog::Catalog;
use crate::executor::GateExecutor;
use crate::models::{EvaluationReport, Timestamp};
use chrono::DateTime;
use pgame_shared::observability::metrics::record_evaluation_pass;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// 触发重算的刺激类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    CandidateChanged,
    Tick,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CandidateChanged => write!(f, "candidate"),
            Self::Tick => write!(f, "tick"),
        }
    }
}

/// 游戏会话
pub struct GameSession {
    catalog: Arc<Catalog>,
    executor: GateExecutor,
    candidate: String,
    /// 最近一次有效的时间戳
    now: Timestamp,
    report: EvaluationReport,
}

impl GameSession {
    /// 以空候选字符串开始一个会话
    pub fn new(catalog: Arc<Catalog>, now: Timestamp) -> Self {
        let executor = GateExecutor::new();
        let report = executor.evaluate(&catalog, "", &now);

        Self {
            catalog,
            executor,
            candidate: String::new(),
            now,
            report,
        }
    }

    /// 替换执行器（例如启用追踪）并立即重算
    pub fn with_executor(mut self, executor: GateExecutor) -> Self {
        self.executor = executor;
        self.reevaluate(Trigger::CandidateChanged);
        self
    }

    /// 候选字符串变化
    #[instrument(level = "debug", skip(self, candidate))]
    pub fn on_candidate_changed(&mut self, candidate: impl Into<String>) -> &EvaluationReport {
        self.candidate = candidate.into();
        self.reevaluate(Trigger::CandidateChanged);
        &self.report
    }

    /// 时钟 tick；信号缺失时沿用最近一次有效的时间戳
    pub fn on_tick(&mut self, now: Option<Timestamp>) -> &EvaluationReport {
        match now {
            Some(now) => {
                if now < self.now {
                    debug!(previous = %self.now, current = %now, "clock moved backwards");
                }
                self.now = now;
            }
            None => {
                warn!(last_known_good = %self.now, "missing clock signal, reusing last known timestamp");
            }
        }

        self.reevaluate(Trigger::Tick);
        &self.report
    }

    /// 文本形式的时钟 tick（RFC 3339）；无法解析时沿用最近一次有效的时间戳
    pub fn on_tick_raw(&mut self, raw: &str) -> &EvaluationReport {
        let parsed = match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(now) => Some(now),
            Err(e) => {
                warn!(signal = %raw, error = %e, "unparseable clock signal");
                None
            }
        };

        self.on_tick(parsed)
    }

    pub fn report(&self) -> &EvaluationReport {
        &self.report
    }

    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    pub fn now(&self) -> &Timestamp {
        &self.now
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn reevaluate(&mut self, trigger: Trigger) {
        self.report = self
            .executor
            .evaluate(&self.catalog, &self.candidate, &self.now);

        record_evaluation_pass(
            &trigger.to_string(),
            self.report.summary.satisfied_count,
            self.report.evaluation_time_us as f64 / 1_000_000.0,
        );
    }
}
