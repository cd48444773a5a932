//! 时钟信号源
//!
//! 引擎本身从不读取系统时钟；时间戳由表现层通过 `Clock` 取得后显式传入。

use crate::error::{Result, RuleError};
use crate::models::Timestamp;
use chrono::{FixedOffset, Local, Utc};

/// 时钟信号源，`None` 表示本次信号缺失或不可用
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> Option<Timestamp>;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    /// 固定 UTC 偏移；为空时使用本地时区
    offset: Option<FixedOffset>,
}

impl SystemClock {
    /// 使用本地时区
    pub fn local() -> Self {
        Self { offset: None }
    }

    /// 使用固定 UTC 偏移（分钟）
    pub fn with_offset_minutes(minutes: i32) -> Result<Self> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| RuleError::ParseError(format!("无效的 UTC 偏移: {} 分钟", minutes)))?;

        Ok(Self {
            offset: Some(offset),
        })
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Option<Timestamp> {
        Some(match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => Local::now().fixed_offset(),
        })
    }
}
