//! 更新系リクエストの組み立て
//!
//! フォームの文字列を送信用の値に変換する。数値は parseInt 相当で
//! 整数化し、UPCの名前・口径が空なら "Unknown" を入れる。

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{InventoryForm, ProductResult, Thresholds, UpcForm};

/// UPCレコードで空欄の代わりに入れる値
pub const UNKNOWN: &str = "Unknown";

/// 在庫追加・更新の送信内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryPayload {
    pub upc: String,
    pub name: String,
    pub caliber: String,
    pub count_per_box: u32,
    pub quantity: u32,
    pub notes: String,
}

/// UPC追加・更新の送信内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcPayload {
    pub upc: String,
    pub name: String,
    pub caliber: String,
    pub count_per_box: u32,
}

/// しきい値保存の送信内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThresholdsPayload {
    pub caliber: String,
    pub critical: u64,
    pub low: u64,
    pub target: u64,
}

impl ThresholdsPayload {
    pub fn new(caliber: &str, thresholds: Thresholds) -> Self {
        Self {
            caliber: caliber.to_string(),
            critical: thresholds.critical,
            low: thresholds.low,
            target: thresholds.target,
        }
    }
}

/// parseInt 相当の整数化
///
/// 先頭の空白と符号を許し、続く数字だけを読む。数字がなければ `None`。
///
/// # Examples
/// ```
/// use ammo_inventory_common::mutation::coerce_int;
///
/// assert_eq!(coerce_int(" 50 "), Some(50));
/// assert_eq!(coerce_int("20rd"), Some(20));
/// assert_eq!(coerce_int("abc"), None);
/// assert_eq!(coerce_int("99999999999999999999"), Some(i64::MAX));
/// ```
pub fn coerce_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    // 桁あふれは上限に張り付け、呼び出し側で「大きすぎる」と判定させる
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn positive_field(value: &str, field: &str) -> Result<u32> {
    match coerce_int(value) {
        Some(n) if n > 0 => u32::try_from(n)
            .map_err(|_| Error::Validation(format!("{} is too large", field))),
        Some(_) => Err(Error::Validation(format!("{} must be greater than zero", field))),
        None => Err(Error::Validation(format!("{} must be a whole number", field))),
    }
}

fn non_negative_field(value: &str, field: &str) -> Result<u32> {
    match coerce_int(value) {
        Some(n) if n >= 0 => u32::try_from(n)
            .map_err(|_| Error::Validation(format!("{} is too large", field))),
        Some(_) => Err(Error::Validation(format!("{} cannot be negative", field))),
        None => Err(Error::Validation(format!("{} must be a whole number", field))),
    }
}

fn or_unknown(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

impl InventoryForm {
    /// 送信内容に変換
    pub fn to_payload(&self) -> Result<InventoryPayload> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Name is required".into()));
        }
        let caliber = self.caliber.trim();
        if caliber.is_empty() {
            return Err(Error::Validation("Caliber is required".into()));
        }

        Ok(InventoryPayload {
            upc: self.upc.trim().to_string(),
            name: name.to_string(),
            caliber: caliber.to_string(),
            count_per_box: positive_field(&self.count_per_box, "count_per_box")?,
            quantity: non_negative_field(&self.quantity, "quantity")?,
            notes: self.notes.clone(),
        })
    }
}

impl UpcForm {
    /// 送信内容に変換
    ///
    /// 箱入り数が空欄なら 0 を送る（サーバー側で判定）
    pub fn to_payload(&self) -> Result<UpcPayload> {
        let upc = self.upc.trim();
        if upc.is_empty() {
            return Err(Error::Validation("UPC code is required".into()));
        }

        let count_per_box = if self.count_per_box.trim().is_empty() {
            0
        } else {
            non_negative_field(&self.count_per_box, "count_per_box")?
        };

        Ok(UpcPayload {
            upc: upc.to_string(),
            name: or_unknown(&self.name),
            caliber: or_unknown(&self.caliber),
            count_per_box,
        })
    }
}

impl ProductResult {
    /// 検索結果をUPCカタログへ取り込む内容に変換
    pub fn to_upc_payload(&self) -> Result<UpcPayload> {
        match self.upc.as_deref().map(str::trim) {
            Some(upc) if !upc.is_empty() => self.to_upc_form().to_payload(),
            _ => Err(Error::Validation(format!("No UPC found for {}", self.name))),
        }
    }
}

/// しきい値の入力欄
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThresholdForm {
    pub critical: String,
    pub low: String,
    pub target: String,
}

impl ThresholdForm {
    pub fn from_thresholds(t: Thresholds) -> Self {
        Self {
            critical: t.critical.to_string(),
            low: t.low.to_string(),
            target: t.target.to_string(),
        }
    }

    /// 大小関係はサーバーに任せ、ここでは数値であることだけ確認する
    pub fn to_thresholds(&self) -> Result<Thresholds> {
        Ok(Thresholds::new(
            non_negative_field(&self.critical, "Critical level")? as u64,
            non_negative_field(&self.low, "Low level")? as u64,
            non_negative_field(&self.target, "Target level")? as u64,
        ))
    }
}

/// 削除確認
///
/// 対象の行から作り、ダイアログには `display_name` をそのまま表示する。
/// 削除リクエストはこの値を経由しないと出せない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub id: u64,
    pub display_name: String,
}

impl DeleteConfirmation {
    pub fn new(id: u64, display_name: impl Into<String>) -> Self {
        Self { id, display_name: display_name.into() }
    }

    /// ダイアログ本文
    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete \"{}\"?", self.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_form() {
        let form = ThresholdForm::from_thresholds(Thresholds::new(100, 200, 500));
        assert_eq!(form.to_thresholds().unwrap(), Thresholds::new(100, 200, 500));

        let bad = ThresholdForm { low: "x".into(), ..form };
        let err = bad.to_thresholds().unwrap_err();
        assert_eq!(err.to_string(), "Low level must be a whole number");
    }

    fn form(count: &str, quantity: &str) -> InventoryForm {
        InventoryForm {
            upc: "029465064389".to_string(),
            name: "Federal American Eagle 9mm".to_string(),
            caliber: "9mm Luger".to_string(),
            count_per_box: count.to_string(),
            quantity: quantity.to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_coerce_int_like_parse_int() {
        assert_eq!(coerce_int("42"), Some(42));
        assert_eq!(coerce_int("  7 boxes"), Some(7));
        assert_eq!(coerce_int("-3"), Some(-3));
        assert_eq!(coerce_int("+8"), Some(8));
        assert_eq!(coerce_int("3.9"), Some(3));
        assert_eq!(coerce_int(""), None);
        assert_eq!(coerce_int("-"), None);
        assert_eq!(coerce_int("x1"), None);
    }

    #[test]
    fn test_inventory_payload_coerces_numbers() {
        let payload = form("50", " 2").to_payload().unwrap();
        assert_eq!(payload.count_per_box, 50);
        assert_eq!(payload.quantity, 2);
        assert_eq!(payload.notes, "");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["count_per_box"], 50);
        assert_eq!(json["quantity"], 2);
    }

    #[test]
    fn test_inventory_payload_allows_zero_quantity() {
        assert_eq!(form("20", "0").to_payload().unwrap().quantity, 0);
    }

    #[test]
    fn test_inventory_payload_rejects_bad_numbers() {
        assert!(matches!(form("0", "1").to_payload(), Err(Error::Validation(_))));
        assert!(matches!(form("", "1").to_payload(), Err(Error::Validation(_))));
        assert!(matches!(form("50", "-1").to_payload(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_oversized_numbers_report_too_large() {
        let err = form("50", "99999999999999999999").to_payload().unwrap_err();
        assert_eq!(err.to_string(), "quantity is too large");

        let err = form("5000000000", "1").to_payload().unwrap_err();
        assert_eq!(err.to_string(), "count_per_box is too large");
    }

    #[test]
    fn test_inventory_payload_requires_name() {
        let mut f = form("50", "1");
        f.name = "   ".to_string();
        let err = f.to_payload().unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }

    #[test]
    fn test_upc_payload_defaults_unknown() {
        let f = UpcForm {
            upc: "020892221932".to_string(),
            name: String::new(),
            caliber: " ".to_string(),
            count_per_box: String::new(),
        };
        let payload = f.to_payload().unwrap();
        assert_eq!(payload.name, UNKNOWN);
        assert_eq!(payload.caliber, UNKNOWN);
        assert_eq!(payload.count_per_box, 0);
    }

    #[test]
    fn test_product_without_upc_cannot_be_imported() {
        let product = ProductResult {
            name: "PSA 5.56 55gr".to_string(),
            ..Default::default()
        };
        let err = product.to_upc_payload().unwrap_err();
        assert!(err.to_string().contains("PSA 5.56 55gr"));
    }

    #[test]
    fn test_product_import_payload() {
        let product = ProductResult {
            upc: Some("090255815511".to_string()),
            name: "Federal American Eagle 5.56mm 55gr FMJ".to_string(),
            caliber: Some("5.56".to_string()),
            count_per_box: Some(20),
            ..Default::default()
        };
        let payload = product.to_upc_payload().unwrap();
        assert_eq!(payload.upc, "090255815511");
        assert_eq!(payload.count_per_box, 20);
    }

    #[test]
    fn test_delete_confirmation_shows_exact_name() {
        let confirm = DeleteConfirmation::new(42, "Federal 9mm FMJ");
        assert_eq!(confirm.id, 42);
        assert!(confirm.prompt().contains("\"Federal 9mm FMJ\""));
    }
}
