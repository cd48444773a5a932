//! 规则引擎领域模型

use crate::predicates::{Predicate, PredicateSpec};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// 评估时间戳（带时区偏移，日期/时间规则按该偏移格式化）
pub type Timestamp = DateTime<FixedOffset>;

/// 规则定义（规则目录中的一行数据）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: u32,
    pub text: String,
    pub category: String,
    pub check: PredicateSpec,
}

impl RuleDefinition {
    pub fn new(
        id: u32,
        text: impl Into<String>,
        category: impl Into<String>,
        check: PredicateSpec,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            category: category.into(),
            check,
        }
    }
}

/// 目录中的规则：身份信息加上检查逻辑
#[derive(Clone)]
pub struct Rule {
    pub id: u32,
    pub text: String,
    pub category: String,
    predicate: Arc<dyn Predicate>,
}

impl Rule {
    pub fn new(
        id: u32,
        text: impl Into<String>,
        category: impl Into<String>,
        predicate: Arc<dyn Predicate>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            category: category.into(),
            predicate,
        }
    }

    pub fn predicate(&self) -> &dyn Predicate {
        self.predicate.as_ref()
    }

    /// 数据化描述，自定义谓词返回 None
    pub fn spec(&self) -> Option<&PredicateSpec> {
        self.predicate.spec()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field(
                "predicate",
                &self.spec().map(|s| s.kind()).unwrap_or("custom"),
            )
            .finish()
    }
}

/// 规则状态机：LOCKED -> ACTIVE_UNSATISFIED -> ACTIVE_SATISFIED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    Locked,
    ActiveUnsatisfied,
    ActiveSatisfied,
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "LOCKED"),
            Self::ActiveUnsatisfied => write!(f, "ACTIVE_UNSATISFIED"),
            Self::ActiveSatisfied => write!(f, "ACTIVE_SATISFIED"),
        }
    }
}

/// 单条规则在一次评估中的派生状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleState {
    pub id: u32,
    pub text: String,
    pub category: String,
    pub active: bool,
    pub satisfied: bool,
}

impl RuleState {
    pub fn status(&self) -> RuleStatus {
        match (self.active, self.satisfied) {
            (true, true) => RuleStatus::ActiveSatisfied,
            (true, false) => RuleStatus::ActiveUnsatisfied,
            (false, _) => RuleStatus::Locked,
        }
    }
}

/// 汇总计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationSummary {
    pub active_count: usize,
    pub satisfied_count: usize,
    pub total_rule_count: usize,
    pub is_complete: bool,
}

/// 一次评估的完整结果
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    /// 按 ID 升序排列的规则状态
    pub rules: Vec<RuleState>,
    pub summary: EvaluationSummary,
    /// 候选字符串长度（字符数）
    pub candidate_length: usize,
    pub evaluated_at: Timestamp,
    pub evaluation_trace: Vec<String>,
    pub evaluation_time_us: u64,
}

impl EvaluationReport {
    pub fn get(&self, id: u32) -> Option<&RuleState> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// 当前卡住进度的规则（唯一一条激活但未满足的规则）
    pub fn blocking_rule(&self) -> Option<&RuleState> {
        self.rules.iter().find(|r| r.active && !r.satisfied)
    }

    pub fn is_complete(&self) -> bool {
        self.summary.is_complete
    }

    /// 规则状态与汇总是否一致（忽略耗时与追踪）
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.summary == other.summary && self.rules == other.rules
    }
}
