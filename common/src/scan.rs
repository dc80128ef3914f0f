//! バーコードスキャンのセッション制御
//!
//! 状態遷移:
//! `Idle → Starting → Scanning → Detected → Idle`（reset）
//! `Scanning → Error → Idle`
//!
//! カメラストリームはこのセッションだけが保持し、検出・エラー・reset・drop の
//! どの経路でも必ず解放する。デコード自体は外部ライブラリ（`Camera` 実装側）。

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::ScanDetection;

/// 検出を受け付ける誤差の上限（これ以下なら採用）
pub const MAX_DETECTION_ERROR: f64 = 0.1;

pub const MSG_POINT_CAMERA: &str = "Point camera at a barcode...";
pub const MSG_CAMERA_ERROR: &str = "Camera access error. Check permissions.";

/// 検出領域（各辺からの内側オフセット、%）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanArea {
    pub top: u8,
    pub right: u8,
    pub bottom: u8,
    pub left: u8,
}

impl ScanArea {
    /// 中央 50%×50%
    pub const CENTER_HALF: ScanArea = ScanArea { top: 25, right: 25, bottom: 25, left: 25 };

    /// 領域の幅（フレーム比 %）
    pub fn width_percent(&self) -> u8 {
        100u8.saturating_sub(self.left).saturating_sub(self.right)
    }

    pub fn height_percent(&self) -> u8 {
        100u8.saturating_sub(self.top).saturating_sub(self.bottom)
    }
}

/// スキャナ設定（JSブリッジにはJSONで渡す）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    pub width: u32,
    pub height: u32,
    /// "environment" = 背面カメラ
    pub facing_mode: String,
    pub area: ScanArea,
    pub readers: Vec<String>,
    /// 1秒あたりのデコード回数
    pub frequency: u32,
    #[serde(skip)]
    pub max_error: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            facing_mode: "environment".to_string(),
            area: ScanArea::CENTER_HALF,
            readers: [
                "upc_reader",
                "upc_e_reader",
                "ean_reader",
                "ean_8_reader",
                "code_39_reader",
                "code_128_reader",
            ]
            .iter()
            .map(|r| r.to_string())
            .collect(),
            frequency: 10,
            max_error: MAX_DETECTION_ERROR,
        }
    }
}

impl ScanConfig {
    /// 誤差指標で検出を採用するか
    ///
    /// NaN は採用しない
    pub fn accepts(&self, detection: &ScanDetection) -> bool {
        !detection.code.trim().is_empty() && detection.error <= self.max_error
    }
}

/// カメラ/デコーダ側の境界
pub trait Camera {
    /// ストリームの取得を要求する（準備完了は `camera_ready` で通知）
    fn acquire(&mut self, config: &ScanConfig) -> Result<()>;

    /// ストリームを解放する
    fn release(&mut self);

    /// 検出成功の音・振動（失敗しても無視される）
    fn signal_success(&mut self) -> Result<()> {
        Ok(())
    }
}

/// セッション状態
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Idle,
    Starting,
    Scanning,
    Detected(String),
    Error(String),
}

impl ScanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanState::Idle => "idle",
            ScanState::Starting => "starting",
            ScanState::Scanning => "scanning",
            ScanState::Detected(_) => "detected",
            ScanState::Error(_) => "error",
        }
    }
}

/// スキャンセッション
pub struct ScanSession<C: Camera> {
    camera: C,
    config: ScanConfig,
    state: ScanState,
    holding_stream: bool,
    message: String,
}

impl<C: Camera> ScanSession<C> {
    pub fn new(camera: C, config: ScanConfig) -> Self {
        Self {
            camera,
            config,
            state: ScanState::Idle,
            holding_stream: false,
            message: String::new(),
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    /// カメラ起動中またはスキャン中
    pub fn is_active(&self) -> bool {
        matches!(self.state, ScanState::Starting | ScanState::Scanning)
    }

    /// スキャン開始
    ///
    /// 既に起動中なら何もせず `Ok(false)`。カメラ取得に失敗したら
    /// `Idle` に戻して `Error::Camera` を返す。
    pub fn start(&mut self) -> Result<bool> {
        if self.is_active() {
            debug!(state = self.state.as_str(), "scanner already active, start ignored");
            return Ok(false);
        }
        if self.state != ScanState::Idle {
            self.reset();
        }

        self.transition(ScanState::Starting);
        self.message = MSG_POINT_CAMERA.to_string();

        match self.camera.acquire(&self.config) {
            Ok(()) => {
                self.holding_stream = true;
                Ok(true)
            }
            Err(Error::Camera(reason)) => Err(self.camera_failed(&reason)),
            Err(e) => Err(self.camera_failed(&e.to_string())),
        }
    }

    /// カメラ初期化完了
    ///
    /// 初期化中に reset された場合、遅れて開いたストリームはここで閉じる
    pub fn camera_ready(&mut self) -> bool {
        if self.state == ScanState::Starting {
            self.holding_stream = true;
            self.transition(ScanState::Scanning);
            true
        } else {
            debug!(state = self.state.as_str(), "late camera start, releasing stream");
            self.camera.release();
            false
        }
    }

    /// カメラ取得失敗
    pub fn camera_failed(&mut self, reason: &str) -> Error {
        self.release_stream();
        self.transition(ScanState::Idle);
        self.message = MSG_CAMERA_ERROR.to_string();
        Error::Camera(reason.to_string())
    }

    /// フレームごとの検出イベント
    ///
    /// 採用した場合のみコードを返す（呼び出し側がルックアップする）。
    /// 1セッションで採用されるのは最大1件。
    pub fn on_detection(&mut self, detection: &ScanDetection) -> Option<String> {
        if self.state != ScanState::Scanning {
            return None;
        }
        if !self.config.accepts(detection) {
            return None;
        }

        let code = detection.code.trim().to_string();
        self.release_stream();
        self.transition(ScanState::Detected(code.clone()));
        self.message = format!("Barcode detected: {}", code);

        if let Err(e) = self.camera.signal_success() {
            debug!(error = %e, "success feedback unavailable");
        }

        Some(code)
    }

    /// スキャン中のストリーム/デコーダ障害
    pub fn on_stream_error(&mut self, reason: &str) {
        if !self.is_active() {
            return;
        }
        self.release_stream();
        self.message = format!("Scanner error: {}", reason);
        self.transition(ScanState::Error(reason.to_string()));
    }

    /// どの状態からでも Idle に戻す
    pub fn reset(&mut self) {
        self.release_stream();
        self.message.clear();
        self.transition(ScanState::Idle);
    }

    fn release_stream(&mut self) {
        if self.holding_stream {
            self.camera.release();
            self.holding_stream = false;
        }
    }

    fn transition(&mut self, next: ScanState) {
        debug!(from = self.state.as_str(), to = next.as_str(), "scan state");
        self.state = next;
    }
}

impl<C: Camera> Drop for ScanSession<C> {
    fn drop(&mut self) {
        self.release_stream();
    }
}
