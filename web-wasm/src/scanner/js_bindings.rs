//! バーコードスキャナ JavaScript Bridge バインディング
//!
//! デコードは Quagga（`window.Quagga`）に任せ、ここでは開始・停止と
//! 検出イベントの受け渡しだけを宣言する。

use ammo_inventory_common::ScanConfig;
use wasm_bindgen::prelude::*;

// ============================================
// JavaScript関数のextern宣言
// ============================================

#[wasm_bindgen(module = "/js/scanner-bridge.js")]
extern "C" {
    /// デコーダライブラリが読み込まれているか
    #[wasm_bindgen(js_name = "isAvailable")]
    pub fn is_available_js() -> bool;

    /// カメラを開いてスキャンを開始
    ///
    /// # Arguments
    /// * `target_id` - 映像を表示する要素のID
    /// * `config_json` - ScanConfigのJSON文字列
    ///
    /// # Returns
    /// カメラ準備完了で `true`、起動中に停止されたら `false` で resolve、
    /// 権限拒否などで reject される Promise
    #[wasm_bindgen(js_name = "startScanner", catch)]
    pub fn start_scanner_js(target_id: &str, config_json: &str) -> Result<js_sys::Promise, JsValue>;

    /// スキャンを停止してカメラを解放（起動中なら起動を取り消す）
    #[wasm_bindgen(js_name = "stopScanner")]
    pub fn stop_scanner_js();

    /// 検出イベント `(code, error)` のハンドラを登録
    #[wasm_bindgen(js_name = "onDetected")]
    pub fn on_detected_js(handler: &Closure<dyn FnMut(String, f64)>);

    /// ストリーム障害のハンドラを登録
    #[wasm_bindgen(js_name = "onScannerError")]
    pub fn on_scanner_error_js(handler: &Closure<dyn FnMut(String)>);

    #[wasm_bindgen(js_name = "clearHandlers")]
    pub fn clear_handlers_js();

    /// 検出成功の音・振動
    #[wasm_bindgen(js_name = "signalSuccess", catch)]
    pub fn signal_success_js() -> Result<(), JsValue>;
}

// ============================================
// ヘルパー関数
// ============================================

/// ScanConfigをJSON文字列に変換
pub fn config_to_json(config: &ScanConfig) -> Result<String, String> {
    serde_json::to_string(config).map_err(|e| format!("JSON serialization failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_to_json_camel_case() {
        let json = config_to_json(&ScanConfig::default()).expect("JSON変換失敗");

        assert!(json.contains("\"facingMode\":\"environment\""));
        assert!(json.contains("\"width\":640"));
        assert!(json.contains("\"height\":480"));
        assert!(json.contains("\"frequency\":10"));
        assert!(json.contains("\"top\":25"));
        // 誤差の上限はRust側だけで使う
        assert!(!json.contains("maxError"));
    }

    #[test]
    fn test_config_to_json_readers() {
        let json = config_to_json(&ScanConfig::default()).expect("JSON変換失敗");
        for reader in ["upc_reader", "upc_e_reader", "ean_reader", "ean_8_reader", "code_39_reader", "code_128_reader"] {
            assert!(json.contains(reader), "missing {}", reader);
        }
    }
}
