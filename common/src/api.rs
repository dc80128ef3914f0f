//! REST API の契約
//!
//! エンドポイントのパス、リクエスト/レスポンスの形を定義する。
//! サーバーはすべて `{success, message?, ...}` 形式のJSONを返す
//! （CSVダウンロードのみ本文がテキスト）。

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

use crate::types::{InventoryItem, ProductResult, Thresholds, UpcRecord};

/// パスセグメントとしてエスケープする文字
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// HTTPメソッド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// リクエスト本文
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// multipart/form-data の単一ファイル
    File {
        field: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

/// トランスポートに渡すリクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), body: RequestBody::Empty }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self { method: Method::Post, path: path.into(), body: RequestBody::Empty }
    }

    pub fn post_json(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self { method: Method::Post, path: path.into(), body: RequestBody::Json(body) }
    }

    /// 冪等な読み取りか（リトライ可否の判定に使う）
    pub fn is_read(&self) -> bool {
        self.method == Method::Get
    }
}

/// トランスポートから返るレスポンス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// エンドポイントのパス
pub mod paths {
    use super::{utf8_percent_encode, SEGMENT};

    pub const ADD_INVENTORY: &str = "/api/add_inventory";
    pub const ADD_UPC: &str = "/api/add_upc";
    pub const SAVE_THRESHOLDS: &str = "/api/save_thresholds";
    pub const EXPORT_CSV: &str = "/api/export_csv";
    pub const CSV_TEMPLATE: &str = "/api/csv_template";
    pub const IMPORT_CSV: &str = "/api/import_csv";
    pub const SCRAPE_AMMO: &str = "/api/scrape_ammo";
    pub const INVENTORY: &str = "/api/inventory";
    pub const UPCS: &str = "/api/upcs";

    fn segment(value: &str) -> String {
        utf8_percent_encode(value, SEGMENT).to_string()
    }

    pub fn lookup_upc(code: &str) -> String {
        format!("/api/lookup_upc/{}", segment(code))
    }

    pub fn update_inventory(id: u64) -> String {
        format!("/api/update_inventory/{}", id)
    }

    pub fn delete_inventory(id: u64) -> String {
        format!("/api/delete_inventory/{}", id)
    }

    pub fn update_upc(id: u64) -> String {
        format!("/api/update_upc/{}", id)
    }

    pub fn delete_upc(id: u64) -> String {
        format!("/api/delete_upc/{}", id)
    }

    pub fn get_thresholds(caliber: &str) -> String {
        format!("/api/get_thresholds/{}", segment(caliber))
    }
}

/// 共通レスポンス形式
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

/// 追加フィールドなし
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoPayload {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LookupData {
    pub name: String,
    pub caliber: String,
    pub count_per_box: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LookupPayload {
    pub data: Option<LookupData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThresholdsPayload {
    pub thresholds: Option<Thresholds>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImportPayload {
    /// サーバーはエラーなしの場合 null を返す
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchPayload {
    pub results: Vec<ProductResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryListPayload {
    pub items: Vec<InventoryItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpcListPayload {
    pub upcs: Vec<UpcRecord>,
}

/// 商品検索リクエスト
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub max_products: u32,
}
