//! 文本评估器
//!
//! 实现各类谓词背后的字符串分析函数。所有函数对任意 Unicode 输入都是全函数，
//! 按 `char`（Unicode 标量值）计数，时间复杂度与输入长度线性相关。

use crate::models::Timestamp;
use crate::predicates::CharClass;
use std::collections::{HashMap, HashSet};

/// 文本评估器
pub struct TextEvaluator;

impl TextEvaluator {
    /// 字符数
    pub fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    /// 属于某类别的字符数量
    pub fn count_class(s: &str, class: CharClass) -> usize {
        s.chars().filter(|c| class.contains(*c)).count()
    }

    /// 属于某类别的不同字符数量
    pub fn distinct_count(s: &str, class: CharClass) -> usize {
        s.chars()
            .filter(|c| class.contains(*c))
            .collect::<HashSet<char>>()
            .len()
    }

    /// 某类别字符的最长连续段长度
    pub fn longest_run(s: &str, class: CharClass) -> usize {
        let mut longest = 0;
        let mut current = 0;

        for c in s.chars() {
            if class.contains(c) {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }

        longest
    }

    /// 是否存在出现至少 `min` 次的字符（可限定类别）
    pub fn has_repeated(s: &str, min: usize, class: Option<CharClass>) -> bool {
        let mut counts: HashMap<char, usize> = HashMap::new();

        for c in s.chars() {
            if let Some(class) = class
                && !class.contains(c)
            {
                continue;
            }

            let count = counts.entry(c).or_insert(0);
            *count += 1;
            if *count >= min {
                return true;
            }
        }

        false
    }

    /// 统计长度不小于 `min_length` 的回文子串（按位置计，不去重），数到 `cap` 即停止
    ///
    /// 中心扩展法：每次成功扩展都对应一个新的回文子串，
    /// 因此总工作量为 O(n * min_length + cap)。
    pub fn palindrome_count(s: &str, min_length: usize, cap: usize) -> usize {
        let chars: Vec<char> = s.chars().collect();
        let n = chars.len();
        let mut count = 0;

        if cap == 0 {
            return 0;
        }

        // 2n-1 个中心：偶数下标为单字符中心，奇数下标为两字符间隙
        for center in 0..(2 * n).saturating_sub(1) {
            let mut left = center / 2;
            let mut right = left + center % 2;

            while right < n && chars[left] == chars[right] {
                if right - left + 1 >= min_length {
                    count += 1;
                    if count >= cap {
                        return count;
                    }
                }

                if left == 0 {
                    break;
                }
                left -= 1;
                right += 1;
            }
        }

        count
    }

    /// 评估时间戳对应的日期字符串（DD.MM.YYYY）
    pub fn date_stamp(now: &Timestamp) -> String {
        now.format("%d.%m.%Y").to_string()
    }

    /// 评估时间戳对应的时间字符串（HH:MM）
    pub fn time_stamp(now: &Timestamp) -> String {
        now.format("%H:%M").to_string()
    }
}
