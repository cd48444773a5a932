//! 终端前端的事件循环
//!
//! 把 stdin 的每一行当作新的候选字符串，按固定间隔读取时钟并触发 tick，
//! 两类事件都交给 `GameSession` 处理。tick 没有改变任何规则状态时不重绘。

use crate::clock::Clock;
use crate::error::Result;
use crate::models::EvaluationReport;
use crate::session::GameSession;
use crate::view::{self, RuleTransition};
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// 循环事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    Input(String),
    Tick,
}

/// 一次重绘所需的上下文
#[derive(Debug, Clone)]
pub struct Redraw {
    /// 本次事件之前的评估结果
    pub previous: EvaluationReport,
    pub transitions: Vec<RuleTransition>,
}

impl Redraw {
    fn initial(report: &EvaluationReport) -> Self {
        Self {
            previous: report.clone(),
            transitions: Vec::new(),
        }
    }

    pub fn highlights(&self, current: &EvaluationReport) -> view::Highlights {
        view::highlights(&self.previous, current)
    }
}

/// 事件循环
pub struct GameLoop<C: Clock> {
    session: GameSession,
    clock: C,
    tick_interval: Duration,
}

impl<C: Clock> GameLoop<C> {
    pub fn new(session: GameSession, clock: C, tick_interval: Duration) -> Self {
        Self {
            session,
            clock,
            tick_interval,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// 处理单个事件，返回需要的重绘
    ///
    /// 输入事件总是重绘；tick 只在有规则状态变化时重绘。
    pub fn handle(&mut self, event: LoopEvent) -> Option<Redraw> {
        let previous = self.session.report().clone();

        let redraw_always = match event {
            LoopEvent::Input(line) => {
                self.session.on_candidate_changed(line);
                true
            }
            LoopEvent::Tick => {
                let now = self.clock.now();
                self.session.on_tick(now);
                false
            }
        };

        let transitions = view::diff(&previous, self.session.report());
        if !redraw_always && transitions.is_empty() {
            return None;
        }

        Some(Redraw {
            previous,
            transitions,
        })
    }

    /// 运行直到输入结束或收到关闭信号，返回最终会话
    pub async fn run<R, S, F>(mut self, input: R, shutdown: S, mut render: F) -> Result<GameSession>
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
        F: FnMut(&Redraw, &EvaluationReport),
    {
        let mut lines = input.lines();
        let mut ticker = time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        // interval 的第一次 tick 立即完成
        ticker.tick().await;

        render(&Redraw::initial(self.session.report()), self.session.report());

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
                line = lines.next_line() => match line? {
                    Some(line) => {
                        if let Some(redraw) = self.handle(LoopEvent::Input(line)) {
                            render(&redraw, self.session.report());
                        }
                    }
                    None => {
                        info!("Input closed");
                        break;
                    }
                },
                _ = ticker.tick() => {
                    match self.handle(LoopEvent::Tick) {
                        Some(redraw) => {
                            debug!(changed = redraw.transitions.len(), "tick changed rule states");
                            render(&redraw, self.session.report());
                        }
                        None => debug!("tick without changes"),
                    }
                }
            }
        }

        Ok(self.session)
    }
}
