//! ネットワーク境界
//!
//! ブラウザ(fetch)とCLI(reqwest)で実装を差し替えるためのトレイト。
//! タイムアウトは実装側で `ClientConfig::timeout_ms` を使って掛ける。

use crate::api::{HttpRequest, HttpResponse};
use crate::error::Result;

/// リクエストを1回送るだけの薄い境界
///
/// 戻り値の `Err` は通信失敗（`Error::Transport` / `Error::Timeout`）に限る。
/// HTTPステータスの解釈は呼び出し側で行う。
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).send(request).await
    }
}

/// 通信ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// 1リクエストあたりの上限時間
    pub timeout_ms: u32,
    /// GETの追加試行回数（更新系はリトライしない）
    pub read_retries: u32,
}

impl ClientConfig {
    pub const DEFAULT_TIMEOUT_MS: u32 = 15_000;
    pub const DEFAULT_READ_RETRIES: u32 = 1;
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
            read_retries: Self::DEFAULT_READ_RETRIES,
        }
    }
}
