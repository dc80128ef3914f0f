//! 在庫データの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - InventoryItem: 在庫1行（箱単位）
//! - UpcRecord: UPCカタログ1件
//! - Thresholds: 口径ごとの在庫しきい値
//! - ScanDetection: バーコード検出1回分（保存しない）
//! - InventoryForm / UpcForm: 入力中の下書き（文字列のまま保持）

use serde::{Deserialize, Serialize};

/// 在庫アイテム
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryItem {
    pub id: u64,
    pub name: String,
    pub upc: String,
    pub caliber: String,
    /// サーバーは負の値も保存できるので符号付きで受ける
    pub count_per_box: i64,
    /// 手持ちの箱数
    pub quantity: i64,
    /// サーバー計算値。欠けている場合は `rounds()` で補う
    pub total_rounds: Option<i64>,
    pub notes: String,
}

impl InventoryItem {
    /// 総弾数
    pub fn rounds(&self) -> i64 {
        self.total_rounds
            .unwrap_or_else(|| self.count_per_box.saturating_mul(self.quantity))
    }
}

/// UPCカタログレコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpcRecord {
    pub id: u64,
    pub upc: String,
    pub name: String,
    pub caliber: String,
    pub count_per_box: i64,
}

/// 口径ごとのしきい値
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub critical: u64,
    pub low: u64,
    pub target: u64,
}

impl Thresholds {
    pub const fn new(critical: u64, low: u64, target: u64) -> Self {
        Self { critical, low, target }
    }

    /// critical ≤ low ≤ target か（強制はしない、表示用）
    pub fn is_ordered(&self) -> bool {
        self.critical <= self.low && self.low <= self.target
    }
}

/// バーコード検出結果
///
/// `error` はデコーダの誤差指標で、小さいほど信頼できる
#[derive(Debug, Clone, PartialEq)]
pub struct ScanDetection {
    pub code: String,
    pub error: f64,
}

impl ScanDetection {
    pub fn new(code: impl Into<String>, error: f64) -> Self {
        Self { code: code.into(), error }
    }
}

/// 在庫入力フォームの下書き
///
/// 入力欄の値をそのまま保持し、送信時に整数へ変換する
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryForm {
    pub upc: String,
    pub name: String,
    pub caliber: String,
    pub count_per_box: String,
    pub quantity: String,
    pub notes: String,
}

impl InventoryForm {
    /// 既存アイテムから編集用フォームを作る
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            upc: item.upc.clone(),
            name: item.name.clone(),
            caliber: item.caliber.clone(),
            count_per_box: item.count_per_box.to_string(),
            quantity: item.quantity.to_string(),
            notes: item.notes.clone(),
        }
    }
}

/// UPCカタログ入力フォーム
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpcForm {
    pub upc: String,
    pub name: String,
    pub caliber: String,
    pub count_per_box: String,
}

impl UpcForm {
    pub fn from_record(record: &UpcRecord) -> Self {
        Self {
            upc: record.upc.clone(),
            name: record.name.clone(),
            caliber: record.caliber.clone(),
            count_per_box: record.count_per_box.to_string(),
        }
    }
}

/// 商品検索の結果1件
///
/// スクレイパー側で取れなかった項目は欠ける
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductResult {
    pub upc: Option<String>,
    pub name: String,
    pub caliber: Option<String>,
    pub count_per_box: Option<u32>,
    pub price: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl ProductResult {
    /// 取り込み用のUPCフォームに変換
    pub fn to_upc_form(&self) -> UpcForm {
        UpcForm {
            upc: self.upc.clone().unwrap_or_default(),
            name: self.name.clone(),
            caliber: self.caliber.clone().unwrap_or_default(),
            count_per_box: self
                .count_per_box
                .map(|c| c.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn price_label(&self) -> &str {
        self.price.as_deref().unwrap_or("Price N/A")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_item_deserialize_without_total() {
        let json = r#"{
            "id": 2,
            "name": "Winchester 9mm Luger 115gr FMJ",
            "upc": "020892212602",
            "caliber": "9mm Luger",
            "count_per_box": 50,
            "quantity": 5,
            "notes": "Training ammo"
        }"#;

        let item: InventoryItem = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(item.id, 2);
        assert_eq!(item.total_rounds, None);
        assert_eq!(item.rounds(), 250);
    }

    #[test]
    fn test_inventory_item_prefers_server_total() {
        let item = InventoryItem {
            count_per_box: 20,
            quantity: 3,
            total_rounds: Some(61),
            ..Default::default()
        };
        assert_eq!(item.rounds(), 61);
    }

    #[test]
    fn test_inventory_list_keeps_negative_rows() {
        // CSV取り込みでは負の箱数も保存される
        let json = r#"[
            {"id": 1, "name": "Federal 9mm FMJ", "caliber": "9mm Luger", "count_per_box": 50, "quantity": 2},
            {"id": 2, "name": "Broken row", "caliber": "9mm Luger", "count_per_box": 50, "quantity": -1}
        ]"#;

        let items: Vec<InventoryItem> = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].quantity, -1);
        assert_eq!(items[1].rounds(), -50);
    }

    #[test]
    fn test_thresholds_ordering_hint() {
        assert!(Thresholds::new(100, 200, 500).is_ordered());
        assert!(Thresholds::new(100, 100, 100).is_ordered());
        assert!(!Thresholds::new(300, 200, 500).is_ordered());
    }

    #[test]
    fn test_form_from_item() {
        let item = InventoryItem {
            id: 7,
            name: "Federal 9mm FMJ".to_string(),
            caliber: "9mm Luger".to_string(),
            count_per_box: 50,
            quantity: 4,
            ..Default::default()
        };
        let form = InventoryForm::from_item(&item);
        assert_eq!(form.count_per_box, "50");
        assert_eq!(form.quantity, "4");
        assert_eq!(form.name, "Federal 9mm FMJ");
    }

    #[test]
    fn test_product_result_partial() {
        let json = r#"{"name": "PSA 9mm 115gr", "url": "https://example.com/p/1", "price": "$12.99"}"#;
        let product: ProductResult = serde_json::from_str(json).unwrap();
        assert_eq!(product.upc, None);
        assert_eq!(product.price_label(), "$12.99");

        let form = product.to_upc_form();
        assert_eq!(form.upc, "");
        assert_eq!(form.caliber, "");
        assert_eq!(form.count_per_box, "");
    }
}
