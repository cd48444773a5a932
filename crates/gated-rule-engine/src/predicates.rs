//! 谓词定义
//!
//! 规则目录中每条规则的检查逻辑由 `PredicateSpec` 描述（数据），
//! 并最终以 `Predicate` trait 对象的形式参与评估。

use crate::error::Result;
use crate::models::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 规则检查逻辑
///
/// 实现必须是纯函数：结果只由候选字符串和评估时间戳决定，
/// 不得读取全局时钟或产生副作用。
pub trait Predicate: Send + Sync {
    fn check(&self, candidate: &str, now: &Timestamp) -> Result<bool>;

    /// 数据化的谓词描述（自定义谓词没有）
    fn spec(&self) -> Option<&PredicateSpec> {
        None
    }
}

/// 字符类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    /// ASCII 数字 0-9
    Digit,
    /// A-Z 以及 Ç Ğ I İ Ö Ş Ü
    Uppercase,
    /// a-z 以及 ç ğ ı i ö ş ü
    Lowercase,
    /// 特殊符号
    Special,
    /// 罗马数字字母 I V X L C D M
    Roman,
    /// 元音（先转小写再比较）
    Vowel,
    /// 固定几个 Unicode 区段内的 emoji
    Emoji,
}

const UPPERCASE_EXTRA: &str = "ÇĞIİÖŞÜ";
const LOWERCASE_EXTRA: &str = "çğıiöşü";
const SPECIAL_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";
const ROMAN_NUMERALS: &str = "IVXLCDM";
const VOWELS: &str = "aeiouəıöü";

impl CharClass {
    pub fn contains(self, c: char) -> bool {
        match self {
            Self::Digit => c.is_ascii_digit(),
            Self::Uppercase => c.is_ascii_uppercase() || UPPERCASE_EXTRA.contains(c),
            Self::Lowercase => c.is_ascii_lowercase() || LOWERCASE_EXTRA.contains(c),
            Self::Special => SPECIAL_SYMBOLS.contains(c),
            Self::Roman => ROMAN_NUMERALS.contains(c),
            Self::Vowel => {
                let mut lower = c.to_lowercase();
                match (lower.next(), lower.next()) {
                    (Some(l), None) => VOWELS.contains(l),
                    _ => false,
                }
            }
            Self::Emoji => matches!(
                c as u32,
                0x1F600..=0x1F64F | 0x1F300..=0x1F5FF | 0x1F680..=0x1F6FF | 0x1F1E0..=0x1F1FF
            ),
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Digit => "digit",
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
            Self::Special => "special",
            Self::Roman => "roman",
            Self::Vowel => "vowel",
            Self::Emoji => "emoji",
        };
        write!(f, "{}", s)
    }
}

fn default_ignore_case() -> bool {
    true
}

/// 谓词描述（规则目录中的 `check` 字段）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredicateSpec {
    // 长度
    MinLength {
        min: usize,
    },

    // 字符类别计数
    MinCount {
        class: CharClass,
        min: usize,
    },
    MinDistinct {
        class: CharClass,
        min: usize,
    },

    // 包含检查
    ContainsText {
        text: String,
    },
    ContainsAll {
        texts: Vec<String>,
    },
    ContainsAny {
        words: Vec<String>,
        #[serde(default = "default_ignore_case")]
        ignore_case: bool,
    },

    // 结构性质
    ClassRun {
        class: CharClass,
        length: usize,
    },
    RepeatedChar {
        min: usize,
        #[serde(default)]
        class: Option<CharClass>,
    },
    Palindromes {
        min_length: usize,
        min_count: usize,
    },

    // 时间相关
    TodayDate,
    CurrentTime,

    // 胜利规则
    Always,
}

impl PredicateSpec {
    /// 谓词种类名称（与 JSON 中的 `kind` 一致）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MinLength { .. } => "min_length",
            Self::MinCount { .. } => "min_count",
            Self::MinDistinct { .. } => "min_distinct",
            Self::ContainsText { .. } => "contains_text",
            Self::ContainsAll { .. } => "contains_all",
            Self::ContainsAny { .. } => "contains_any",
            Self::ClassRun { .. } => "class_run",
            Self::RepeatedChar { .. } => "repeated_char",
            Self::Palindromes { .. } => "palindromes",
            Self::TodayDate => "today_date",
            Self::CurrentTime => "current_time",
            Self::Always => "always",
        }
    }

    /// 是否依赖评估时间戳
    pub fn is_time_dependent(&self) -> bool {
        matches!(self, Self::TodayDate | Self::CurrentTime)
    }
}

impl fmt::Display for PredicateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinLength { min } => write!(f, "min_length({})", min),
            Self::MinCount { class, min } => write!(f, "min_count({}, {})", class, min),
            Self::MinDistinct { class, min } => write!(f, "min_distinct({}, {})", class, min),
            Self::ClassRun { class, length } => write!(f, "class_run({}, {})", class, length),
            Self::Palindromes {
                min_length,
                min_count,
            } => write!(f, "palindromes({}, {})", min_length, min_count),
            other => write!(f, "{}", other.kind()),
        }
    }
}
