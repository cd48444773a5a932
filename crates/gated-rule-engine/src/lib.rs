//! 顺序门控规则引擎
//!
//! 提供密码游戏的规则评估能力，支持：
//! - JSON 数据表形式的规则目录和编译期校验
//! - 顺序门控的单遍评估，谓词故障按规则隔离
//! - 候选字符串变化与时钟 tick 两类刺激的会话驱动
//! - 终端前端所需的派生视图

pub mod catalog;
pub mod clock;
pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod game_loop;
pub mod models;
pub mod predicates;
pub mod session;
pub mod view;

pub use catalog::{Catalog, CatalogBuilder, DEFAULT_MAX_RULES};
pub use clock::{Clock, SystemClock};
pub use compiler::CatalogCompiler;
pub use error::{Result, RuleError};
pub use executor::GateExecutor;
pub use game_loop::{GameLoop, LoopEvent, Redraw};
pub use models::{
    EvaluationReport, EvaluationSummary, Rule, RuleDefinition, RuleState, RuleStatus, Timestamp,
};
pub use predicates::{CharClass, Predicate, PredicateSpec};
pub use session::{GameSession, Trigger};
