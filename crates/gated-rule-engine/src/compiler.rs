//! 规则目录编译器
//!
//! 将 JSON 规则表解析、校验并编译成内存中的 `Catalog`。
//! 所有目录错误都在加载阶段暴露，评估阶段可以假定目录合法。

use crate::catalog::{Catalog, DEFAULT_MAX_RULES};
use crate::error::{Result, RuleError};
use crate::evaluator::TextEvaluator;
use crate::models::{Rule, RuleDefinition, Timestamp};
use crate::predicates::{Predicate, PredicateSpec};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::sync::Arc;

/// 编译后的内置谓词
///
/// `contains_any` 的词表在编译期合并为一个正则表达式。
#[derive(Debug, Clone)]
pub struct CompiledPredicate {
    spec: PredicateSpec,
    matcher: Option<Regex>,
}

impl CompiledPredicate {
    /// 编译单个谓词描述（不做参数校验，参见 `CatalogCompiler`）
    pub fn compile(spec: PredicateSpec) -> std::result::Result<Self, regex::Error> {
        let matcher = match &spec {
            PredicateSpec::ContainsAny { words, ignore_case } => {
                let pattern = words
                    .iter()
                    .map(|w| regex::escape(w))
                    .collect::<Vec<_>>()
                    .join("|");
                Some(
                    RegexBuilder::new(&pattern)
                        .case_insensitive(*ignore_case)
                        .build()?,
                )
            }
            _ => None,
        };

        Ok(Self { spec, matcher })
    }
}

impl Predicate for CompiledPredicate {
    fn check(&self, candidate: &str, now: &Timestamp) -> Result<bool> {
        let matched = match &self.spec {
            PredicateSpec::MinLength { min } => TextEvaluator::char_len(candidate) >= *min,
            PredicateSpec::MinCount { class, min } => {
                TextEvaluator::count_class(candidate, *class) >= *min
            }
            PredicateSpec::MinDistinct { class, min } => {
                TextEvaluator::distinct_count(candidate, *class) >= *min
            }
            PredicateSpec::ContainsText { text } => candidate.contains(text.as_str()),
            PredicateSpec::ContainsAll { texts } => {
                texts.iter().all(|t| candidate.contains(t.as_str()))
            }
            PredicateSpec::ContainsAny { .. } => match &self.matcher {
                Some(re) => re.is_match(candidate),
                None => {
                    return Err(RuleError::PredicateFault(
                        "contains_any 谓词缺少已编译的正则表达式".to_string(),
                    ));
                }
            },
            PredicateSpec::ClassRun { class, length } => {
                TextEvaluator::longest_run(candidate, *class) >= *length
            }
            PredicateSpec::RepeatedChar { min, class } => {
                TextEvaluator::has_repeated(candidate, *min, *class)
            }
            PredicateSpec::Palindromes {
                min_length,
                min_count,
            } => TextEvaluator::palindrome_count(candidate, *min_length, *min_count) >= *min_count,
            PredicateSpec::TodayDate => candidate.contains(&TextEvaluator::date_stamp(now)),
            PredicateSpec::CurrentTime => candidate.contains(&TextEvaluator::time_stamp(now)),
            PredicateSpec::Always => true,
        };

        Ok(matched)
    }

    fn spec(&self) -> Option<&PredicateSpec> {
        Some(&self.spec)
    }
}

/// 规则目录编译器
pub struct CatalogCompiler {
    max_rules: usize,
    require_victory_terminal: bool,
}

impl CatalogCompiler {
    pub fn new() -> Self {
        Self {
            max_rules: DEFAULT_MAX_RULES,
            require_victory_terminal: true,
        }
    }

    /// 设置规则数量上限
    pub fn with_max_rules(mut self, max_rules: usize) -> Self {
        self.max_rules = max_rules;
        self
    }

    /// 允许最后一条规则不是 always（用于合成目录）
    pub fn allow_open_terminal(mut self) -> Self {
        self.require_victory_terminal = false;
        self
    }

    /// 从 JSON 字符串编译目录
    pub fn compile_from_json(&self, json: &str) -> Result<Catalog> {
        let definitions: Vec<RuleDefinition> = serde_json::from_str(json)?;
        self.compile(definitions)
    }

    /// 编译规则定义列表
    pub fn compile(&self, definitions: Vec<RuleDefinition>) -> Result<Catalog> {
        let mut rules = Vec::with_capacity(definitions.len());

        for def in definitions {
            self.validate_definition(&def)?;

            let id = def.id;
            let predicate = CompiledPredicate::compile(def.check)
                .map_err(|source| RuleError::InvalidPattern { id, source })?;

            rules.push(Rule::new(id, def.text, def.category, Arc::new(predicate)));
        }

        let catalog = self.assemble(rules)?;

        if self.require_victory_terminal
            && let Some(terminal) = catalog.terminal()
            && terminal.spec() != Some(&PredicateSpec::Always)
        {
            return Err(RuleError::TerminalNotVictory(terminal.id));
        }

        Ok(catalog)
    }

    /// 校验 ID 并排序，组装成目录
    ///
    /// 自定义谓词的目录也走这里，因此只检查与谓词无关的约束。
    pub fn assemble(&self, mut rules: Vec<Rule>) -> Result<Catalog> {
        if rules.is_empty() {
            return Err(RuleError::EmptyCatalog);
        }

        if rules.len() > self.max_rules {
            return Err(RuleError::TooManyRules {
                count: rules.len(),
                max: self.max_rules,
            });
        }

        let mut seen = HashSet::with_capacity(rules.len());
        for rule in &rules {
            if rule.id == 0 {
                return Err(RuleError::InvalidId(rule.id));
            }
            if !seen.insert(rule.id) {
                return Err(RuleError::DuplicateId(rule.id));
            }
        }

        rules.sort_by_key(|r| r.id);

        Ok(Catalog::from_sorted(rules))
    }

    /// 校验单条规则定义
    fn validate_definition(&self, def: &RuleDefinition) -> Result<()> {
        if def.text.trim().is_empty() {
            return Err(RuleError::InvalidParameter {
                id: def.id,
                message: "规则描述不能为空".to_string(),
            });
        }

        self.validate_spec(def.id, &def.check)
    }

    /// 校验谓词参数
    fn validate_spec(&self, id: u32, spec: &PredicateSpec) -> Result<()> {
        let invalid = |message: &str| RuleError::InvalidParameter {
            id,
            message: message.to_string(),
        };

        match spec {
            PredicateSpec::MinLength { min }
            | PredicateSpec::MinCount { min, .. }
            | PredicateSpec::MinDistinct { min, .. } => {
                if *min == 0 {
                    return Err(invalid("阈值 min 必须大于 0"));
                }
            }
            PredicateSpec::ContainsText { text } => {
                if text.is_empty() {
                    return Err(invalid("text 不能为空"));
                }
            }
            PredicateSpec::ContainsAll { texts: list }
            | PredicateSpec::ContainsAny { words: list, .. } => {
                if list.is_empty() {
                    return Err(invalid("词表不能为空"));
                }
                if list.iter().any(|w| w.is_empty()) {
                    return Err(invalid("词表中不能有空字符串"));
                }
            }
            PredicateSpec::ClassRun { length, .. } => {
                if *length == 0 {
                    return Err(invalid("length 必须大于 0"));
                }
            }
            PredicateSpec::RepeatedChar { min, .. } => {
                if *min < 2 {
                    return Err(invalid("重复次数 min 至少为 2"));
                }
            }
            PredicateSpec::Palindromes {
                min_length,
                min_count,
            } => {
                if *min_length < 2 {
                    return Err(invalid("回文最小长度至少为 2"));
                }
                if *min_count == 0 {
                    return Err(invalid("min_count 必须大于 0"));
                }
            }
            PredicateSpec::TodayDate | PredicateSpec::CurrentTime | PredicateSpec::Always => {}
        }

        Ok(())
    }
}

impl Default for CatalogCompiler {
    fn default() -> Self {
        Self::new()
    }
}
