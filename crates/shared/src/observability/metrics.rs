//! 指标模块
//!
//! 基于 metrics crate 的门面记录指标。二进制程序不安装导出器，
//! 未安装 recorder 时所有记录调用都是空操作。

/// 注册指标描述
pub fn describe() {
    metrics::describe_counter!(
        "rule_evaluation_passes_total",
        "Total number of gated evaluation passes"
    );
    metrics::describe_histogram!(
        "rule_evaluation_duration_seconds",
        "Gated evaluation pass duration in seconds"
    );
    metrics::describe_gauge!(
        "rule_satisfied_rules",
        "Number of satisfied rules after the latest pass"
    );
    metrics::describe_counter!(
        "rule_predicate_faults_total",
        "Total number of predicate faults treated as not satisfied"
    );
}

// ============================================================================
// 便捷的指标记录函数
// ============================================================================

/// 记录一次评估遍历
#[inline]
pub fn record_evaluation_pass(trigger: &str, satisfied: usize, duration_secs: f64) {
    metrics::counter!(
        "rule_evaluation_passes_total",
        "trigger" => trigger.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "rule_evaluation_duration_seconds",
        "trigger" => trigger.to_string()
    )
    .record(duration_secs);

    metrics::gauge!("rule_satisfied_rules").set(satisfied as f64);
}

/// 记录谓词故障
#[inline]
pub fn record_predicate_fault(rule_id: u32) {
    metrics::counter!(
        "rule_predicate_faults_total",
        "rule_id" => rule_id.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_functions_do_not_panic() {
        // 即使没有初始化 recorder，这些函数也不应该 panic
        describe();
        record_evaluation_pass("candidate", 4, 0.0001);
        record_evaluation_pass("tick", 0, 0.0);
        record_predicate_fault(52);
    }
}
