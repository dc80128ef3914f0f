//! ブラウザのカメラでのバーコードスキャン
//!
//! `ScanSession` を JS ブリッジにつなぐ。セッションは `Rc<RefCell<_>>` で持ち、
//! JS からのコールバックは `Weak` 経由で触る。

pub mod js_bindings;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ammo_inventory_common::{Camera, Error, Result, ScanConfig, ScanDetection, ScanSession, ScanState};
use gloo::console;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::api::fetch::js_error_message;
use js_bindings::*;

/// `Camera` のブラウザ実装
pub struct WasmCamera {
    target_id: String,
    pending: Option<js_sys::Promise>,
}

impl WasmCamera {
    pub fn new(target_id: impl Into<String>) -> Self {
        Self { target_id: target_id.into(), pending: None }
    }

    /// 起動待ちの Promise を取り出す
    fn take_pending(&mut self) -> Option<js_sys::Promise> {
        self.pending.take()
    }
}

impl Camera for WasmCamera {
    fn acquire(&mut self, config: &ScanConfig) -> Result<()> {
        if !is_available_js() {
            return Err(Error::Camera("Barcode scanning library not available".into()));
        }
        let json = config_to_json(config).map_err(Error::Camera)?;
        let promise = start_scanner_js(&self.target_id, &json)
            .map_err(|e| Error::Camera(js_error_message(&e)))?;
        self.pending = Some(promise);
        Ok(())
    }

    fn release(&mut self) {
        self.pending = None;
        stop_scanner_js();
    }

    fn signal_success(&mut self) -> Result<()> {
        signal_success_js().map_err(|e| Error::Camera(js_error_message(&e)))
    }
}

/// 画面に出すスキャナの状態
#[derive(Debug, Clone, PartialEq)]
pub struct ScanView {
    pub state: ScanState,
    pub message: String,
}

impl Default for ScanView {
    fn default() -> Self {
        Self { state: ScanState::Idle, message: String::new() }
    }
}

impl ScanView {
    pub fn is_active(&self) -> bool {
        matches!(self.state, ScanState::Starting | ScanState::Scanning)
    }
}

type Session = ScanSession<WasmCamera>;

/// スキャナとコールバックの束
struct Callbacks {
    publish: Box<dyn Fn(ScanView)>,
    on_code: Box<dyn Fn(String)>,
    on_error: Box<dyn Fn(Error)>,
}

impl Callbacks {
    fn publish<C: Camera>(&self, session: &ScanSession<C>) {
        (self.publish)(ScanView {
            state: session.state().clone(),
            message: session.message().to_string(),
        });
    }
}

pub struct Scanner {
    session: Rc<RefCell<Session>>,
    callbacks: Rc<Callbacks>,
    _on_detected: Closure<dyn FnMut(String, f64)>,
    _on_error: Closure<dyn FnMut(String)>,
}

impl Scanner {
    /// # Arguments
    /// * `target_id` - 映像を表示する要素のID
    /// * `publish` - 状態が変わるたびに呼ばれる
    /// * `on_code` - 採用したコード（1セッション1回）
    /// * `on_error` - カメラ・ストリームの障害
    pub fn new(
        target_id: &str,
        publish: impl Fn(ScanView) + 'static,
        on_code: impl Fn(String) + 'static,
        on_error: impl Fn(Error) + 'static,
    ) -> Self {
        let session = Rc::new(RefCell::new(ScanSession::new(
            WasmCamera::new(target_id),
            ScanConfig::default(),
        )));
        let callbacks = Rc::new(Callbacks {
            publish: Box::new(publish),
            on_code: Box::new(on_code),
            on_error: Box::new(on_error),
        });

        let on_detected = {
            let weak = Rc::downgrade(&session);
            let callbacks = callbacks.clone();
            Closure::<dyn FnMut(String, f64)>::new(move |code: String, error: f64| {
                let Some(session) = weak.upgrade() else { return };
                dispatch_detection(&session, &callbacks, ScanDetection::new(code, error));
            })
        };

        let on_stream_error = {
            let weak = Rc::downgrade(&session);
            let callbacks = callbacks.clone();
            Closure::<dyn FnMut(String)>::new(move |reason: String| {
                let Some(session) = weak.upgrade() else { return };
                session.borrow_mut().on_stream_error(&reason);
                callbacks.publish(&session.borrow());
                (callbacks.on_error)(Error::Camera(reason));
            })
        };

        on_detected_js(&on_detected);
        on_scanner_error_js(&on_stream_error);

        Self {
            session,
            callbacks,
            _on_detected: on_detected,
            _on_error: on_stream_error,
        }
    }

    /// スキャン開始（起動中なら何もしない）
    pub fn start(&self) {
        let started = self.session.borrow_mut().start();
        self.callbacks.publish(&self.session.borrow());

        match started {
            Ok(true) => {
                let pending = self.session.borrow_mut().camera_mut().take_pending();
                if let Some(promise) = pending {
                    wait_for_camera(Rc::downgrade(&self.session), self.callbacks.clone(), promise);
                }
            }
            Ok(false) => {}
            Err(e) => {
                console::error!("scanner start failed:", e.to_string());
                (self.callbacks.on_error)(e);
            }
        }
    }

    /// どの状態からでも停止して Idle に戻す
    pub fn reset(&self) {
        self.session.borrow_mut().reset();
        self.callbacks.publish(&self.session.borrow());
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        clear_handlers_js();
    }
}

/// 検出イベントをセッションに渡す
///
/// 採用されたときだけ `on_code` を呼ぶ（ストリームはセッション側で解放済み）
fn dispatch_detection<C: Camera>(
    session: &RefCell<ScanSession<C>>,
    callbacks: &Callbacks,
    detection: ScanDetection,
) {
    let accepted = session.borrow_mut().on_detection(&detection);
    callbacks.publish(&session.borrow());
    if let Some(code) = accepted {
        (callbacks.on_code)(code);
    }
}

/// カメラ起動の結果をセッションに反映する
///
/// `result` は `Ok(true)` で起動、`Ok(false)` は起動中に停止された、`Err` は取得失敗。
/// セッションが既に破棄されていれば、開いてしまったカメラを `release_orphan` で閉じる。
fn finish_camera_start<C: Camera>(
    weak: &Weak<RefCell<ScanSession<C>>>,
    callbacks: &Callbacks,
    result: std::result::Result<bool, String>,
    release_orphan: impl FnOnce(),
) {
    let Some(session) = weak.upgrade() else {
        if matches!(result, Ok(true)) {
            release_orphan();
        }
        return;
    };

    let failure = match result {
        Ok(true) => {
            session.borrow_mut().camera_ready();
            None
        }
        Ok(false) => None,
        // reset 済みなら失敗は表示しない
        Err(reason) if *session.borrow().state() == ScanState::Starting => {
            Some(session.borrow_mut().camera_failed(&reason))
        }
        Err(_) => None,
    };
    callbacks.publish(&session.borrow());

    if let Some(e) = failure {
        (callbacks.on_error)(e);
    }
}

/// カメラ起動の完了を待ってセッションに反映する
fn wait_for_camera(weak: Weak<RefCell<Session>>, callbacks: Rc<Callbacks>, promise: js_sys::Promise) {
    spawn_local(async move {
        let result = match JsFuture::from(promise).await {
            Ok(value) => Ok(value.as_bool().unwrap_or(true)),
            Err(e) => {
                let reason = js_error_message(&e);
                console::error!("camera start failed:", &reason);
                Err(reason)
            }
        };
        finish_camera_start(&weak, &callbacks, result, stop_scanner_js);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeCamera {
        acquired: Rc<Cell<u32>>,
        released: Rc<Cell<u32>>,
    }

    impl Camera for FakeCamera {
        fn acquire(&mut self, _config: &ScanConfig) -> Result<()> {
            self.acquired.set(self.acquired.get() + 1);
            Ok(())
        }

        fn release(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    struct Recorded {
        codes: Rc<RefCell<Vec<String>>>,
        errors: Rc<RefCell<Vec<String>>>,
        views: Rc<RefCell<Vec<ScanView>>>,
    }

    fn recording_callbacks() -> (Callbacks, Recorded) {
        let recorded = Recorded {
            codes: Rc::default(),
            errors: Rc::default(),
            views: Rc::default(),
        };
        let codes = recorded.codes.clone();
        let errors = recorded.errors.clone();
        let views = recorded.views.clone();
        let callbacks = Callbacks {
            publish: Box::new(move |view| views.borrow_mut().push(view)),
            on_code: Box::new(move |code| codes.borrow_mut().push(code)),
            on_error: Box::new(move |e| errors.borrow_mut().push(e.to_string())),
        };
        (callbacks, recorded)
    }

    fn started_session() -> (Rc<RefCell<ScanSession<FakeCamera>>>, Rc<Cell<u32>>) {
        let camera = FakeCamera::default();
        let released = camera.released.clone();
        let session = Rc::new(RefCell::new(ScanSession::new(camera, ScanConfig::default())));
        assert_eq!(session.borrow_mut().start().ok(), Some(true));
        (session, released)
    }

    #[test]
    fn test_accepted_detection_calls_on_code_once_and_stops_stream() {
        let (callbacks, recorded) = recording_callbacks();
        let (session, released) = started_session();
        finish_camera_start(&Rc::downgrade(&session), &callbacks, Ok(true), || panic!("session alive"));
        assert_eq!(*session.borrow().state(), ScanState::Scanning);

        dispatch_detection(&session, &callbacks, ScanDetection::new("012345678905", 0.05));
        dispatch_detection(&session, &callbacks, ScanDetection::new("999999999999", 0.01));

        assert_eq!(*recorded.codes.borrow(), vec!["012345678905".to_string()]);
        assert_eq!(released.get(), 1);
        assert_eq!(
            recorded.views.borrow().last().map(|v| v.message.clone()),
            Some("Barcode detected: 012345678905".to_string())
        );
    }

    #[test]
    fn test_noisy_detection_is_ignored() {
        let (callbacks, recorded) = recording_callbacks();
        let (session, released) = started_session();
        finish_camera_start(&Rc::downgrade(&session), &callbacks, Ok(true), || {});

        dispatch_detection(&session, &callbacks, ScanDetection::new("012345678905", 0.3));

        assert!(recorded.codes.borrow().is_empty());
        assert_eq!(released.get(), 0);
        assert_eq!(*session.borrow().state(), ScanState::Scanning);
    }

    #[test]
    fn test_camera_opened_after_unmount_is_closed() {
        let (callbacks, recorded) = recording_callbacks();
        let (session, released) = started_session();
        let weak = Rc::downgrade(&session);

        // 起動待ちの間に画面ごと破棄
        drop(session);
        assert_eq!(released.get(), 1);

        let orphan_stops = Cell::new(0);
        finish_camera_start(&weak, &callbacks, Ok(true), || orphan_stops.set(orphan_stops.get() + 1));
        assert_eq!(orphan_stops.get(), 1);
        assert!(recorded.views.borrow().is_empty());
    }

    #[test]
    fn test_cancelled_start_after_unmount_needs_no_stop() {
        let (callbacks, _recorded) = recording_callbacks();
        let (session, _released) = started_session();
        let weak = Rc::downgrade(&session);
        drop(session);

        finish_camera_start(&weak, &callbacks, Ok(false), || panic!("bridge already stopped the camera"));
    }

    #[test]
    fn test_late_camera_after_reset_is_released() {
        let (callbacks, recorded) = recording_callbacks();
        let (session, released) = started_session();
        session.borrow_mut().reset();
        assert_eq!(released.get(), 1);

        finish_camera_start(&Rc::downgrade(&session), &callbacks, Ok(true), || {});
        assert_eq!(*session.borrow().state(), ScanState::Idle);
        assert_eq!(released.get(), 2);

        finish_camera_start(&Rc::downgrade(&session), &callbacks, Err("NotAllowedError".into()), || {});
        assert!(recorded.errors.borrow().is_empty());
    }

    #[test]
    fn test_start_failure_surfaces_camera_error() {
        let (callbacks, recorded) = recording_callbacks();
        let (session, released) = started_session();

        finish_camera_start(&Rc::downgrade(&session), &callbacks, Err("NotAllowedError".into()), || {});

        assert_eq!(*session.borrow().state(), ScanState::Idle);
        assert_eq!(released.get(), 1);
        assert_eq!(
            *recorded.errors.borrow(),
            vec!["Camera access error: NotAllowedError".to_string()]
        );
    }
}
