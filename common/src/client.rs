//! 在庫APIクライアント
//!
//! `Transport` の上にエンドポイントごとの呼び出しを載せる。
//! - GET は通信失敗・タイムアウト時に `read_retries` 回まで再試行
//! - 更新系は再試行しない
//! - `success:false` は `Error::Rejected`（サーバーのメッセージをそのまま）

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{
    paths, Envelope, HttpRequest, HttpResponse, ImportPayload, InventoryListPayload,
    LookupPayload, Method, NoPayload, RequestBody, SearchPayload, SearchRequest, ThresholdsPayload,
    UpcListPayload,
};
use crate::csv::{validate_import_file, ImportReport, FILE_FIELD};
use crate::error::{Error, Result};
use crate::lookup::{outcome_from_envelope, validate_code, LookupOutcome};
use crate::mutation::{self, DeleteConfirmation};
use crate::transport::{ClientConfig, Transport};
use crate::types::{InventoryForm, InventoryItem, ProductResult, Thresholds, UpcForm, UpcRecord};

/// 検索件数の既定値
pub const DEFAULT_MAX_PRODUCTS: u32 = 5;

/// APIクライアント
pub struct InventoryClient<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> InventoryClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ============================================
    // 送信・パース
    // ============================================

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let attempts = if request.is_read() { 1 + self.config.read_retries } else { 1 };
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(method = request.method.as_str(), path = %request.path, attempt, "request");

            match self.transport.send(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!(path = %request.path, error = %e, "read failed, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn call<P: DeserializeOwned>(&self, request: HttpRequest) -> Result<Envelope<P>> {
        let path = request.path.clone();
        let response = self.execute(request).await?;

        match serde_json::from_str::<Envelope<P>>(&response.body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if response.status == 404 => Err(Error::NotFound(path)),
            Err(_) if !response.is_success() => {
                Err(Error::Transport(format!("HTTP {} from {}", response.status, path)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// `success:true` 以外は拒否エラーにする
    async fn call_ok<P: DeserializeOwned>(&self, request: HttpRequest) -> Result<Envelope<P>> {
        let envelope = self.call::<P>(request).await?;
        if envelope.success {
            Ok(envelope)
        } else {
            Err(Error::Rejected(
                envelope.message.unwrap_or_else(|| "Request failed".to_string()),
            ))
        }
    }

    async fn mutate(&self, request: HttpRequest, fallback: &str) -> Result<String> {
        let envelope = self.call_ok::<NoPayload>(request).await?;
        Ok(envelope.message.unwrap_or_else(|| fallback.to_string()))
    }

    // ============================================
    // UPCルックアップ
    // ============================================

    /// UPCを問い合わせて入力フォームを作る（キャッシュなし）
    pub async fn lookup_upc(&self, code: &str) -> Result<LookupOutcome> {
        let code = validate_code(code)?;
        let envelope = match self
            .call::<LookupPayload>(HttpRequest::get(paths::lookup_upc(code)))
            .await
        {
            Ok(envelope) => envelope,
            // JSON以外の404も未登録として手入力に回す
            Err(Error::NotFound(_)) => Envelope::default(),
            Err(e) => return Err(e),
        };
        Ok(outcome_from_envelope(code, envelope))
    }

    // ============================================
    // 在庫
    // ============================================

    pub async fn list_inventory(&self) -> Result<Vec<InventoryItem>> {
        let envelope = self
            .call_ok::<InventoryListPayload>(HttpRequest::get(paths::INVENTORY))
            .await?;
        Ok(envelope.payload.items)
    }

    pub async fn add_inventory(&self, form: &InventoryForm) -> Result<String> {
        let body = serde_json::to_value(form.to_payload()?)?;
        self.mutate(
            HttpRequest::post_json(paths::ADD_INVENTORY, body),
            "Ammunition added to inventory!",
        )
        .await
    }

    pub async fn update_inventory(&self, id: u64, form: &InventoryForm) -> Result<String> {
        let body = serde_json::to_value(form.to_payload()?)?;
        self.mutate(
            HttpRequest::post_json(paths::update_inventory(id), body),
            "Item updated successfully!",
        )
        .await
    }

    /// 削除（確認済みの対象のみ）
    pub async fn delete_inventory(&self, confirmed: &DeleteConfirmation) -> Result<String> {
        self.mutate(
            HttpRequest::post(paths::delete_inventory(confirmed.id)),
            "Item deleted successfully!",
        )
        .await
    }

    // ============================================
    // UPCカタログ
    // ============================================

    pub async fn list_upcs(&self) -> Result<Vec<UpcRecord>> {
        let envelope = self.call_ok::<UpcListPayload>(HttpRequest::get(paths::UPCS)).await?;
        Ok(envelope.payload.upcs)
    }

    pub async fn add_upc(&self, form: &UpcForm) -> Result<String> {
        let body = serde_json::to_value(form.to_payload()?)?;
        self.mutate(HttpRequest::post_json(paths::ADD_UPC, body), "UPC added successfully!")
            .await
    }

    pub async fn update_upc(&self, id: u64, form: &UpcForm) -> Result<String> {
        let body = serde_json::to_value(form.to_payload()?)?;
        self.mutate(
            HttpRequest::post_json(paths::update_upc(id), body),
            "UPC updated successfully!",
        )
        .await
    }

    pub async fn delete_upc(&self, confirmed: &DeleteConfirmation) -> Result<String> {
        self.mutate(
            HttpRequest::post(paths::delete_upc(confirmed.id)),
            "UPC deleted successfully!",
        )
        .await
    }

    /// 検索結果をUPCカタログへ取り込む
    pub async fn import_product(&self, product: &ProductResult) -> Result<String> {
        let body = serde_json::to_value(product.to_upc_payload()?)?;
        self.mutate(HttpRequest::post_json(paths::ADD_UPC, body), "UPC imported successfully!")
            .await
    }

    // ============================================
    // しきい値
    // ============================================

    pub async fn get_thresholds(&self, caliber: &str) -> Result<Thresholds> {
        let envelope = self
            .call_ok::<ThresholdsPayload>(HttpRequest::get(paths::get_thresholds(caliber)))
            .await?;
        envelope
            .payload
            .thresholds
            .ok_or_else(|| Error::NotFound(format!("thresholds for {}", caliber)))
    }

    pub async fn save_thresholds(&self, caliber: &str, thresholds: Thresholds) -> Result<String> {
        let caliber = caliber.trim();
        if caliber.is_empty() {
            return Err(Error::Validation("Please select a caliber".into()));
        }
        let body = serde_json::to_value(mutation::ThresholdsPayload::new(caliber, thresholds))?;
        self.mutate(
            HttpRequest::post_json(paths::SAVE_THRESHOLDS, body),
            "Thresholds updated successfully",
        )
        .await
    }

    // ============================================
    // CSV
    // ============================================

    /// CSVファイルを取り込む
    pub async fn import_csv(&self, file_name: &str, bytes: Vec<u8>) -> Result<ImportReport> {
        validate_import_file(file_name)?;
        let request = HttpRequest {
            method: Method::Post,
            path: paths::IMPORT_CSV.to_string(),
            body: RequestBody::File {
                field: FILE_FIELD.to_string(),
                file_name: file_name.to_string(),
                bytes,
            },
        };
        let envelope = self.call::<ImportPayload>(request).await?;
        ImportReport::from_envelope(envelope)
    }

    /// ダウンロード系（本文をそのまま返す）
    pub async fn download(&self, path: &str) -> Result<String> {
        let response = self.execute(HttpRequest::get(path)).await?;
        if !response.is_success() {
            return Err(Error::Transport(format!("HTTP {} from {}", response.status, path)));
        }
        // 失敗時はJSONの success:false が返る
        if let Ok(envelope) = serde_json::from_str::<Envelope<NoPayload>>(&response.body) {
            if !envelope.success {
                return Err(Error::Rejected(
                    envelope.message.unwrap_or_else(|| "Download failed".to_string()),
                ));
            }
        }
        Ok(response.body)
    }

    pub async fn export_csv(&self) -> Result<String> {
        self.download(paths::EXPORT_CSV).await
    }

    pub async fn csv_template(&self) -> Result<String> {
        self.download(paths::CSV_TEMPLATE).await
    }

    // ============================================
    // 商品検索
    // ============================================

    /// 外部ショップを検索（0件は空のVec）
    pub async fn search_products(&self, query: &str, max_products: u32) -> Result<Vec<ProductResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::Validation("Please enter a search term".into()));
        }
        let max_products = if max_products == 0 { DEFAULT_MAX_PRODUCTS } else { max_products };
        let body = serde_json::to_value(SearchRequest { query, max_products })?;

        let envelope = self
            .call::<SearchPayload>(HttpRequest::post_json(paths::SCRAPE_AMMO, body))
            .await?;
        if !envelope.success {
            return Err(Error::Rejected(envelope.message.unwrap_or_else(|| {
                "An error occurred while scraping ammo data".to_string()
            })));
        }
        Ok(envelope.payload.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// 記録付きの偽トランスポート
    #[derive(Default)]
    struct MockTransport {
        pub requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<VecDeque<Result<HttpResponse>>>,
    }

    impl MockTransport {
        pub fn respond(self, body: &str) -> Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse::ok(body)));
            self
        }

        pub fn respond_status(self, status: u16, body: &str) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Ok(HttpResponse { status, body: body.to_string() }));
            self
        }

        pub fn fail(self, error: Error) -> Self {
            self.responses.borrow_mut().push_back(Err(error));
            self
        }

        pub fn sent(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Transport("no response queued".into())))
        }
    }

    fn client(mock: MockTransport) -> InventoryClient<MockTransport> {
        InventoryClient::new(mock)
    }

    #[test]
    fn test_lookup_found() {
        let c = client(MockTransport::default().respond(
            r#"{"success": true, "data": {"name": "Test 9mm", "caliber": "9mm", "count_per_box": 50}}"#,
        ));

        let outcome = block_on(c.lookup_upc("012345678905")).unwrap();
        let form = outcome.form();
        assert_eq!(form.name, "Test 9mm");
        assert_eq!(form.quantity, "1");
        assert_eq!(form.notes, "");

        let requests = c.transport().requests.borrow();
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[0].path, "/api/lookup_upc/012345678905");
    }

    #[test]
    fn test_lookup_not_found() {
        let c = client(MockTransport::default().respond(r#"{"success": false}"#));
        let outcome = block_on(c.lookup_upc("000000000000")).unwrap();
        assert!(outcome.needs_manual_entry());
        assert_eq!(outcome.form().upc, "000000000000");
        assert_eq!(outcome.form().name, "");
        assert_eq!(outcome.form().quantity, "1");
    }

    #[test]
    fn test_lookup_html_404_falls_back_to_manual_entry() {
        let c = client(MockTransport::default().respond_status(404, "<html>Not Found</html>"));
        let outcome = block_on(c.lookup_upc("000000000000")).unwrap();
        assert!(outcome.needs_manual_entry());
        assert_eq!(outcome.form().upc, "000000000000");
        assert_eq!(outcome.form().quantity, "1");
        assert_eq!(c.transport().sent(), 1);
    }

    #[test]
    fn test_list_inventory_tolerates_negative_quantity() {
        let c = client(MockTransport::default().respond(
            r#"{"success": true, "items": [
                {"id": 1, "name": "Federal 9mm FMJ", "caliber": "9mm Luger", "count_per_box": 50, "quantity": 2},
                {"id": 2, "name": "Imported row", "caliber": "9mm Luger", "count_per_box": 50, "quantity": -1}
            ]}"#,
        ));
        let items = block_on(c.list_inventory()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].quantity, -1);
    }

    #[test]
    fn test_lookup_empty_code_sends_nothing() {
        let c = client(MockTransport::default());
        let err = block_on(c.lookup_upc("  ")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(c.transport().sent(), 0);
    }

    #[test]
    fn test_lookup_is_not_cached() {
        let c = client(
            MockTransport::default()
                .respond(r#"{"success": false}"#)
                .respond(r#"{"success": false}"#),
        );
        block_on(c.lookup_upc("123")).unwrap();
        block_on(c.lookup_upc("123")).unwrap();
        assert_eq!(c.transport().sent(), 2);
    }

    #[test]
    fn test_read_retried_once() {
        let c = client(
            MockTransport::default()
                .fail(Error::Timeout)
                .respond(r#"{"success": true, "items": []}"#),
        );
        let items = block_on(c.list_inventory()).unwrap();
        assert!(items.is_empty());
        assert_eq!(c.transport().sent(), 2);
    }

    #[test]
    fn test_read_gives_up_after_retry() {
        let c = client(
            MockTransport::default()
                .fail(Error::Transport("connection refused".into()))
                .fail(Error::Transport("connection refused".into())),
        );
        let err = block_on(c.lookup_upc("123")).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(c.transport().sent(), 2);
    }

    #[test]
    fn test_mutation_not_retried() {
        let c = client(MockTransport::default().fail(Error::Timeout));
        let form = InventoryForm {
            name: "CCI Blazer Brass 9mm".into(),
            caliber: "9mm Luger".into(),
            count_per_box: "50".into(),
            quantity: "1".into(),
            ..Default::default()
        };
        assert!(block_on(c.add_inventory(&form)).is_err());
        assert_eq!(c.transport().sent(), 1);
    }

    #[test]
    fn test_add_inventory_serializes_integers() {
        let c = client(MockTransport::default().respond(
            r#"{"success": true, "message": "Inventory added successfully"}"#,
        ));
        let form = InventoryForm {
            upc: "076683051202".into(),
            name: "CCI Blazer Brass 9mm 115gr FMJ".into(),
            caliber: "9mm Luger".into(),
            count_per_box: "50".into(),
            quantity: "3".into(),
            notes: String::new(),
        };

        let message = block_on(c.add_inventory(&form)).unwrap();
        assert_eq!(message, "Inventory added successfully");

        let requests = c.transport().requests.borrow();
        assert_eq!(requests[0].path, "/api/add_inventory");
        match &requests[0].body {
            RequestBody::Json(json) => {
                assert_eq!(json["count_per_box"], 50);
                assert_eq!(json["quantity"], 3);
                assert_eq!(json["notes"], "");
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_rejected_mutation_message_verbatim() {
        let c = client(
            MockTransport::default().respond(r#"{"success": false, "message": "Item not found"}"#),
        );
        let form = InventoryForm {
            name: "x".into(),
            caliber: "y".into(),
            count_per_box: "1".into(),
            quantity: "1".into(),
            ..Default::default()
        };
        let err = block_on(c.update_inventory(99, &form)).unwrap_err();
        assert_eq!(err.to_string(), "Item not found");
        assert_eq!(c.transport().requests.borrow()[0].path, "/api/update_inventory/99");
    }

    #[test]
    fn test_invalid_form_sends_nothing() {
        let c = client(MockTransport::default());
        let form = InventoryForm { name: "x".into(), caliber: "y".into(), ..Default::default() };
        assert!(matches!(block_on(c.add_inventory(&form)), Err(Error::Validation(_))));
        assert_eq!(c.transport().sent(), 0);
    }

    #[test]
    fn test_delete_uses_confirmed_id() {
        let c = client(MockTransport::default().respond(r#"{"success": true}"#));
        let confirm = DeleteConfirmation::new(42, "Federal 9mm FMJ");
        let message = block_on(c.delete_inventory(&confirm)).unwrap();
        assert_eq!(message, "Item deleted successfully!");

        let requests = c.transport().requests.borrow();
        assert_eq!(requests[0].path, "/api/delete_inventory/42");
        assert_eq!(requests[0].body, RequestBody::Empty);
    }

    #[test]
    fn test_thresholds_roundtrip_paths() {
        let c = client(
            MockTransport::default()
                .respond(r#"{"success": true, "thresholds": {"critical": 100, "low": 200, "target": 500}}"#)
                .respond(r#"{"success": true, "message": "Thresholds for 9mm Luger updated successfully"}"#),
        );

        let t = block_on(c.get_thresholds("9mm Luger")).unwrap();
        assert_eq!(t, Thresholds::new(100, 200, 500));

        let message = block_on(c.save_thresholds("9mm Luger", Thresholds::new(50, 150, 600))).unwrap();
        assert!(message.contains("9mm Luger"));

        let requests = c.transport().requests.borrow();
        assert_eq!(requests[0].path, "/api/get_thresholds/9mm%20Luger");
        match &requests[1].body {
            RequestBody::Json(json) => {
                assert_eq!(json["caliber"], "9mm Luger");
                assert_eq!(json["target"], 600);
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_import_csv_multipart() {
        let c = client(MockTransport::default().respond(
            r#"{"success": true, "message": "3 imported", "errors": ["row 5: bad caliber"]}"#,
        ));
        let report = block_on(c.import_csv("stock.csv", b"name,upc\n".to_vec())).unwrap();
        assert_eq!(report.message, "3 imported");
        assert_eq!(report.errors, vec!["row 5: bad caliber".to_string()]);

        let requests = c.transport().requests.borrow();
        assert!(matches!(
            &requests[0].body,
            RequestBody::File { field, file_name, .. } if field == "file" && file_name == "stock.csv"
        ));
    }

    #[test]
    fn test_import_rejects_non_csv_locally() {
        let c = client(MockTransport::default());
        assert!(block_on(c.import_csv("stock.txt", vec![])).is_err());
        assert_eq!(c.transport().sent(), 0);
    }

    #[test]
    fn test_search_products() {
        let c = client(MockTransport::default().respond(
            r#"{"success": true, "results": [{"upc": "1", "name": "A", "caliber": "9mm", "count_per_box": 50, "price": "$10", "url": "https://example.com/a"}]}"#,
        ));
        let results = block_on(c.search_products(" 9mm ammo ", 0)).unwrap();
        assert_eq!(results.len(), 1);

        let requests = c.transport().requests.borrow();
        match &requests[0].body {
            RequestBody::Json(json) => {
                assert_eq!(json["query"], "9mm ammo");
                assert_eq!(json["max_products"], 5);
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_search_failure_default_message() {
        let c = client(MockTransport::default().respond(r#"{"success": false}"#));
        let err = block_on(c.search_products("9mm", 3)).unwrap_err();
        assert_eq!(err.to_string(), "An error occurred while scraping ammo data");
    }

    #[test]
    fn test_non_json_error_status() {
        let c = client(
            MockTransport::default().respond_status(500, "<html>Internal Server Error</html>"),
        );
        let form = UpcForm { upc: "1".into(), ..Default::default() };
        let err = block_on(c.add_upc(&form)).unwrap_err();
        assert!(matches!(err, Error::Transport(ref m) if m.contains("500")));
    }

    #[test]
    fn test_download_returns_csv_body() {
        let csv = "name,upc,caliber,count_per_box,quantity,notes\n";
        let c = client(MockTransport::default().respond(csv));
        assert_eq!(block_on(c.export_csv()).unwrap(), csv);
    }
}
