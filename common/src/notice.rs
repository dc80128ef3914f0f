//! 画面通知
//!
//! 失敗はすべて閉じられる通知に落とし、ページは止めない

use crate::error::{Error, ErrorKind};

/// 通知レベル（Bootstrap の alert クラスに対応）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Danger => "danger",
        }
    }
}

impl From<ErrorKind> for NoticeLevel {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Input | ErrorKind::NotFound => NoticeLevel::Warning,
            ErrorKind::Hardware | ErrorKind::Rejected | ErrorKind::Transport => NoticeLevel::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// 通知一覧
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeBoard {
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.notices.push(Notice { id, level, message: message.into() });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Success, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Warning, message)
    }

    /// エラーを文脈付きで通知
    ///
    /// サーバーの拒否メッセージは `"{context}: {message}"` の形でそのまま出す
    pub fn error(&mut self, context: &str, error: &Error) -> u64 {
        let message = match error {
            Error::Validation(msg) => msg.clone(),
            other if context.is_empty() => other.to_string(),
            other => format!("{}: {}", context, other),
        };
        self.push(error.kind().into(), message)
    }

    pub fn dismiss(&mut self, id: u64) {
        self.notices.retain(|n| n.id != id);
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let mut board = NoticeBoard::new();
        let first = board.success("Item updated successfully!");
        let second = board.warning("Please enter a UPC code");
        assert_eq!(board.len(), 2);

        board.dismiss(first);
        assert_eq!(board.notices()[0].id, second);
        assert_eq!(board.notices()[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_rejected_message_is_verbatim() {
        let mut board = NoticeBoard::new();
        board.error("Error updating item", &Error::Rejected("Item not found".into()));

        let notice = &board.notices()[0];
        assert_eq!(notice.message, "Error updating item: Item not found");
        assert_eq!(notice.level, NoticeLevel::Danger);
    }

    #[test]
    fn test_validation_has_no_prefix() {
        let mut board = NoticeBoard::new();
        board.error("Error looking up UPC", &Error::Validation("Please enter a UPC code".into()));
        assert_eq!(board.notices()[0].message, "Please enter a UPC code");
        assert_eq!(board.notices()[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_ids_are_unique_after_dismiss() {
        let mut board = NoticeBoard::new();
        let a = board.success("a");
        board.dismiss(a);
        let b = board.success("b");
        assert_ne!(a, b);
    }
}
