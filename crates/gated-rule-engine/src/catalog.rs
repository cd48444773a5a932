//! 规则目录
//!
//! 有序、加载后不可变的规则列表。内置一份 400 条规则的阿塞拜疆语参考目录。

use crate::compiler::CatalogCompiler;
use crate::error::Result;
use crate::models::Rule;
use crate::predicates::Predicate;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 参考目录（JSON 数据表）
pub const REFERENCE_CATALOG_JSON: &str = include_str!("../catalog/az.json");

/// 默认规则数量上限
pub const DEFAULT_MAX_RULES: usize = 400;

/// 规则目录，按 ID 升序
#[derive(Debug, Clone)]
pub struct Catalog {
    rules: Vec<Rule>,
}

impl Catalog {
    /// 由编译器调用，调用方保证已按 ID 升序且无重复
    pub(crate) fn from_sorted(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// 编译内置参考目录
    pub fn reference() -> Result<Self> {
        let catalog = CatalogCompiler::new().compile_from_json(REFERENCE_CATALOG_JSON)?;
        info!(rules = catalog.len(), "参考规则目录已加载");
        Ok(catalog)
    }

    /// 从磁盘上的 JSON 数据表加载目录
    pub fn from_json_file(path: impl AsRef<Path>, max_rules: usize) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = CatalogCompiler::new()
            .with_max_rules(max_rules)
            .compile_from_json(&json)?;
        info!(rules = catalog.len(), path = %path.display(), "规则目录已加载");
        Ok(catalog)
    }

    /// 使用自定义谓词构建目录
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, id: u32) -> Option<&Rule> {
        self.rules
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|i| &self.rules[i])
    }

    /// 终止规则（ID 最大的规则）
    pub fn terminal(&self) -> Option<&Rule> {
        self.rules.last()
    }
}

/// 自定义谓词目录构建器
#[derive(Default)]
pub struct CatalogBuilder {
    rules: Vec<Rule>,
    max_rules: Option<usize>,
}

impl CatalogBuilder {
    pub fn rule<P>(
        mut self,
        id: u32,
        text: impl Into<String>,
        category: impl Into<String>,
        predicate: P,
    ) -> Self
    where
        P: Predicate + 'static,
    {
        self.rules.push(Rule::new(id, text, category, Arc::new(predicate)));
        self
    }

    pub fn max_rules(mut self, max_rules: usize) -> Self {
        self.max_rules = Some(max_rules);
        self
    }

    pub fn build(self) -> Result<Catalog> {
        CatalogCompiler::new()
            .with_max_rules(self.max_rules.unwrap_or(DEFAULT_MAX_RULES))
            .assemble(self.rules)
    }
}
