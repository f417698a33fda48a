// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::domain::models::rewrite_event::RewriteEvent;

/// 单次运行的事件发送端
///
/// 订阅方断开后发送静默失败，运行照常进行直到持久化结束。
/// 终止事件（complete / error）之后的事件一律丢弃
#[derive(Debug)]
pub struct EventEmitter {
    tx: UnboundedSender<RewriteEvent>,
    terminated: bool,
    subscriber_gone: bool,
}

impl EventEmitter {
    pub fn new(tx: UnboundedSender<RewriteEvent>) -> Self {
        Self {
            tx,
            terminated: false,
            subscriber_gone: false,
        }
    }

    /// 创建一对发送端和接收端
    pub fn channel() -> (Self, UnboundedReceiver<RewriteEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn emit(&mut self, event: RewriteEvent) {
        if self.terminated {
            debug!("Dropping {} event emitted after terminal event", event.kind());
            return;
        }
        self.terminated = event.is_terminal();

        if self.tx.send(event).is_err() && !self.subscriber_gone {
            self.subscriber_gone = true;
            debug!("Event subscriber disconnected, continuing run without delivery");
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}
