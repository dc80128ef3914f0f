//! 同じ操作の後発リクエストで先発を無効にする
//!
//! 操作ごとに `RequestGate` を1つ持ち、送信前に `issue()` で券を取る。
//! 完了時に `is_current()` が偽なら結果を捨てる。

use std::cell::Cell;

use tracing::warn;

/// リクエスト券
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// 操作単位の世代カウンタ（シングルスレッド前提）
#[derive(Debug, Default)]
pub struct RequestGate {
    generation: Cell<u64>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい券を発行し、以前の券を無効にする
    pub fn issue(&self) -> Ticket {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        Ticket { generation: next }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation.get()
    }

    /// 結果を反映してよければ `Some` を返す
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            warn!(generation = ticket.generation, "discarding superseded response");
            None
        }
    }

    /// 発行済みの券をすべて無効にする
    pub fn cancel(&self) {
        self.generation.set(self.generation.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let gate = RequestGate::new();
        let first = gate.issue();
        let second = gate.issue();

        // 先発が後から完了しても反映しない
        assert_eq!(gate.accept(first, "old"), None);
        assert_eq!(gate.accept(second, "new"), Some("new"));
    }

    #[test]
    fn test_cancel_invalidates() {
        let gate = RequestGate::new();
        let ticket = gate.issue();
        gate.cancel();
        assert!(!gate.is_current(ticket));
    }
}
