//! エラー型定義
//!
//! 失敗はすべてこの型に集約し、UI側では `ErrorKind` で通知レベルを決める

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 送信前に弾いた入力エラー（空のUPCなど）
    #[error("{0}")]
    Validation(String),

    /// カメラ取得失敗・権限なし
    #[error("Camera access error: {0}")]
    Camera(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// サーバーが `success:false` で返したメッセージ（そのまま表示する）
    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// エラー分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Hardware,
    NotFound,
    Rejected,
    Transport,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) | Error::Config(_) => ErrorKind::Input,
            Error::Camera(_) => ErrorKind::Hardware,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Rejected(_) => ErrorKind::Rejected,
            Error::Transport(_) | Error::Timeout | Error::Json(_) | Error::Io(_) => {
                ErrorKind::Transport
            }
        }
    }

    /// リトライ対象か（読み取り系のみで使用）
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout)
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
