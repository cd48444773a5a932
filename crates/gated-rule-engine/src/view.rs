//! 表现层派生状态
//!
//! 通过比较两次连续的评估结果得到"刚激活"/"刚完成"等瞬时标记，
//! 引擎本身不保存历史。

use crate::models::{EvaluationReport, RuleState, RuleStatus};
use serde::Serialize;
use std::fmt::Write as _;

/// 单条规则的状态变化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleTransition {
    pub id: u32,
    pub from: RuleStatus,
    pub to: RuleStatus,
}

/// 需要高亮的规则
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Highlights {
    /// 新出现的激活未满足规则
    pub newly_active: Option<u32>,
    /// 新完成的规则（最后一条满足的规则）
    pub newly_completed: Option<u32>,
}

/// 可见行：激活或已满足的规则
///
/// 激活但未满足的规则排在最前，其余按 ID 升序。
pub fn visible_rows(report: &EvaluationReport) -> Vec<&RuleState> {
    let mut rows: Vec<&RuleState> = report
        .rules
        .iter()
        .filter(|r| r.active || r.satisfied)
        .collect();

    rows.sort_by_key(|r| (r.satisfied, r.id));
    rows
}

/// 比较两次评估，列出状态发生变化的规则
///
/// 两次评估必须来自同一个目录；按位置对齐比较。
pub fn diff(prev: &EvaluationReport, next: &EvaluationReport) -> Vec<RuleTransition> {
    prev.rules
        .iter()
        .zip(&next.rules)
        .filter_map(|(before, after)| {
            let (from, to) = (before.status(), after.status());
            (from != to).then_some(RuleTransition {
                id: after.id,
                from,
                to,
            })
        })
        .collect()
}

/// 计算高亮标记
pub fn highlights(prev: &EvaluationReport, next: &EvaluationReport) -> Highlights {
    let last_completed = |r: &EvaluationReport| r.rules.iter().rev().find(|s| s.satisfied).map(|s| s.id);
    let first_active = |r: &EvaluationReport| r.blocking_rule().map(|s| s.id);

    let completed = last_completed(next);
    let active = first_active(next);

    Highlights {
        newly_active: active.filter(|id| first_active(prev) != Some(*id)),
        newly_completed: completed.filter(|id| last_completed(prev) != Some(*id)),
    }
}

/// 渲染终端画面
pub fn render(report: &EvaluationReport, marks: &Highlights) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    let _ = writeln!(
        out,
        "[Uzunluq: {}] [Aktiv: {}] [Yerinə yetirilmiş: {}/{}]",
        report.candidate_length,
        summary.active_count,
        summary.satisfied_count,
        summary.total_rule_count
    );

    for row in visible_rows(report) {
        let icon = match row.status() {
            RuleStatus::ActiveSatisfied => "✔",
            RuleStatus::ActiveUnsatisfied => "✘",
            RuleStatus::Locked => "·",
        };
        let mark = if marks.newly_active == Some(row.id) && !row.satisfied {
            " (yeni)"
        } else if marks.newly_completed == Some(row.id) {
            " (tamamlandı)"
        } else {
            ""
        };

        let _ = writeln!(
            out,
            "{} Qayda {} [{}] {}{}",
            icon, row.id, row.category, row.text, mark
        );
    }

    if summary.is_complete {
        let _ = writeln!(
            out,
            "🎉 Təbriklər! Siz bütün qaydaları yerinə yetirdiniz! Şifrənizin son uzunluğu: {} simvol",
            report.candidate_length
        );
    }

    out
}
