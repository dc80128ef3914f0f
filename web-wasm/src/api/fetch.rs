//! fetch API による `Transport` 実装
//!
//! タイムアウトは AbortController で掛ける

use std::cell::Cell;
use std::rc::Rc;

use ammo_inventory_common::{
    ClientConfig, Error, HttpRequest, HttpResponse, RequestBody, Transport,
};
use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Blob, BlobPropertyBag, FormData, Request, RequestInit, Response};

pub struct FetchTransport {
    base_url: String,
    timeout_ms: u32,
}

impl FetchTransport {
    pub fn new(base_url: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
        }
    }

    /// ページと同じオリジンのサーバー
    pub fn same_origin(config: &ClientConfig) -> Self {
        Self::new("", config)
    }

    async fn fetch(&self, request: HttpRequest, controller: &AbortController) -> Result<HttpResponse, JsValue> {
        let url = format!("{}{}", self.base_url, request.path);

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        opts.set_signal(Some(&controller.signal()));

        let content_type = match request.body {
            RequestBody::Empty => None,
            RequestBody::Json(value) => {
                opts.set_body(&JsValue::from_str(&value.to_string()));
                Some("application/json")
            }
            RequestBody::File { field, file_name, bytes } => {
                let form = FormData::new()?;
                form.append_with_blob_and_filename(&field, &csv_blob(&bytes)?, &file_name)?;
                opts.set_body(&form);
                // multipart の境界はブラウザが付ける
                None
            }
        };

        let req = Request::new_with_str_and_init(&url, &opts)?;
        if let Some(content_type) = content_type {
            req.headers().set("Content-Type", content_type)?;
        }

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&req)).await?;
        let resp: Response = resp_value.dyn_into()?;

        let status = resp.status();
        let body = JsFuture::from(resp.text()?).await?.as_string().unwrap_or_default();
        Ok(HttpResponse { status, body })
    }
}

fn csv_blob(bytes: &[u8]) -> Result<Blob, JsValue> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let props = BlobPropertyBag::new();
    props.set_type("text/csv");
    Blob::new_with_u8_array_sequence_and_options(&parts, &props)
}

/// JS例外から表示用メッセージを取り出す
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> ammo_inventory_common::Result<HttpResponse> {
        let controller = AbortController::new().map_err(|e| Error::Transport(js_error_message(&e)))?;
        let timed_out = Rc::new(Cell::new(false));

        // drop でタイマーは解除される
        let _timer = {
            let controller = controller.clone();
            let timed_out = timed_out.clone();
            Timeout::new(self.timeout_ms, move || {
                timed_out.set(true);
                controller.abort();
            })
        };

        match self.fetch(request, &controller).await {
            Ok(response) => Ok(response),
            Err(_) if timed_out.get() => Err(Error::Timeout),
            Err(e) => Err(Error::Transport(js_error_message(&e))),
        }
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_js_error_message_reads_error_and_string() {
        let err: JsValue = js_sys::Error::new("Failed to fetch").into();
        assert_eq!(js_error_message(&err), "Failed to fetch");
        assert_eq!(js_error_message(&JsValue::from_str("aborted")), "aborted");
    }

    #[wasm_bindgen_test]
    fn wasm_same_origin_has_empty_prefix() {
        let transport = FetchTransport::same_origin(&ClientConfig::default());
        assert_eq!(transport.base_url, "");
        assert_eq!(transport.timeout_ms, 15_000);
    }
}
