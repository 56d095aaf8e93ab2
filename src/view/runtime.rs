//! 单线程事件循环
//!
//! 终端输入、请求完成都通过同一个 channel 进入循环；视图状态只在循环内修改。
//! 网络请求在独立任务中执行，完成后把结果送回循环，由序号检查决定是否应用。

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::command::{self, Input};
use super::keyboard::KeyboardHub;
use super::{Completion, ExplorationView, Fetch, UiEvent, render};
use crate::client::CatalogService;
use crate::error::Result;
use crate::observability::ClientMetrics;
use crate::services::FetchOutcome;

enum Event {
    Line(String),
    InputClosed,
    Completed(Completion),
}

/// 运行时：持有客户端、键盘中心和指标
pub struct Runtime {
    client: Arc<dyn CatalogService>,
    keyboard: KeyboardHub<UiEvent>,
    metrics: ClientMetrics,
}

impl Runtime {
    pub fn new(client: Arc<dyn CatalogService>, metrics: ClientMetrics) -> Self {
        Self {
            client,
            keyboard: KeyboardHub::new(),
            metrics,
        }
    }

    pub fn keyboard(&self) -> &KeyboardHub<UiEvent> {
        &self.keyboard
    }

    pub fn metrics(&self) -> &ClientMetrics {
        &self.metrics
    }

    /// 运行事件循环，直到收到 /quit 或输入结束且没有进行中的请求
    pub async fn run<R, W>(&self, input: R, mut out: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: Write,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let input_tx = tx.clone();
        tokio::spawn(async move {
            let mut input = input;
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match input.read_until(b'\n', &mut buf).await {
                    Ok(0) => break,
                    Ok(_) => {
                        // 非 UTF-8 字节以替换字符保留，不中断后续输入
                        let line = String::from_utf8_lossy(&buf)
                            .trim_end_matches(['\r', '\n'])
                            .to_string();
                        if input_tx.send(Event::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to read input");
                        break;
                    }
                }
            }
            let _ = input_tx.send(Event::InputClosed);
        });

        let mut view = ExplorationView::new(&self.keyboard, self.metrics.clone());
        let mut in_flight = 0usize;
        let mut input_closed = false;

        writeln!(out, "{}", render::render(&view))?;

        while let Some(event) = rx.recv().await {
            match event {
                Event::Line(line) => {
                    let inputs = match command::parse_line(&line) {
                        Ok(inputs) => inputs,
                        Err(e) => {
                            writeln!(out, "{}", e)?;
                            continue;
                        }
                    };

                    for input in inputs {
                        match input {
                            Input::Quit => {
                                info!(in_flight, "quit requested");
                                return Ok(());
                            }
                            Input::Stats => write!(out, "{}", self.metrics.gather())?,
                            Input::Help => writeln!(out, "{}", command::HELP)?,
                            Input::Key(key) => {
                                for event in self.keyboard.dispatch(key) {
                                    let fetch = view.handle(event);
                                    self.dispatch(fetch, &tx, &mut in_flight);
                                }
                            }
                            Input::Ui(event) => {
                                let fetch = view.handle(event);
                                self.dispatch(fetch, &tx, &mut in_flight);
                            }
                        }
                    }
                    writeln!(out, "{}", render::render(&view))?;
                }
                Event::Completed(completion) => {
                    in_flight = in_flight.saturating_sub(1);
                    if view.complete(completion) != FetchOutcome::Stale {
                        writeln!(out, "{}", render::render(&view))?;
                    }
                }
                Event::InputClosed => {
                    debug!(in_flight, "input closed");
                    input_closed = true;
                }
            }

            if input_closed && in_flight == 0 {
                break;
            }
        }

        Ok(())
    }

    fn dispatch(
        &self,
        fetch: Option<Fetch>,
        tx: &mpsc::UnboundedSender<Event>,
        in_flight: &mut usize,
    ) {
        let Some(fetch) = fetch else {
            return;
        };

        *in_flight += 1;
        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let completion = fetch.execute(client.as_ref()).await;
            let _ = tx.send(Event::Completed(completion));
        });
    }
}
