//! 规则引擎错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("规则目录解析失败: {0}")]
    ParseError(String),

    #[error("规则目录为空")]
    EmptyCatalog,

    #[error("规则数量超出上限: {count} > {max}")]
    TooManyRules { count: usize, max: usize },

    #[error("无效的规则 ID: {0}（必须为正整数）")]
    InvalidId(u32),

    #[error("规则 ID 重复: {0}")]
    DuplicateId(u32),

    #[error("规则 {id} 的参数无效: {message}")]
    InvalidParameter { id: u32, message: String },

    #[error("规则 {id} 的正则表达式无效: {source}")]
    InvalidPattern {
        id: u32,
        #[source]
        source: regex::Error,
    },

    #[error("终止规则 {0} 必须是 always 胜利规则")]
    TerminalNotVictory(u32),

    #[error("谓词执行失败: {0}")]
    PredicateFault(String),

    #[error("规则目录文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RuleError>;
