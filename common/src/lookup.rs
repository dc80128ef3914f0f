//! UPCルックアップ結果から入力フォームを作る
//!
//! 見つかった場合はカタログの値を、見つからない場合はコードだけを埋め、
//! どちらも数量は1箱・メモは空にする。

use crate::api::{Envelope, LookupPayload};
use crate::error::{Error, Result};
use crate::types::InventoryForm;

/// 見つからなかったときの案内
pub const NOT_FOUND_MESSAGE: &str = "UPC not found in database. Enter details manually.";

/// 既定の箱数
pub const DEFAULT_QUANTITY: &str = "1";

/// ルックアップ結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// カタログにあった
    Found(InventoryForm),
    /// なかった（手入力が必要）
    NotFound(InventoryForm),
}

impl LookupOutcome {
    pub fn form(&self) -> &InventoryForm {
        match self {
            LookupOutcome::Found(form) | LookupOutcome::NotFound(form) => form,
        }
    }

    pub fn into_form(self) -> InventoryForm {
        match self {
            LookupOutcome::Found(form) | LookupOutcome::NotFound(form) => form,
        }
    }

    pub fn needs_manual_entry(&self) -> bool {
        matches!(self, LookupOutcome::NotFound(_))
    }

    /// スキャン画面のステータス表示
    pub fn status_message(&self) -> String {
        match self {
            LookupOutcome::Found(form) => format!("UPC found: {}", form.name),
            LookupOutcome::NotFound(form) => format!("UPC not found: {}", form.upc),
        }
    }
}

/// スキャン画面の下書き欄
///
/// ルックアップを出した時点で前の下書きを消し、成功した結果だけを残す。
/// 通信失敗時は下書きなし。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupDraft {
    form: Option<InventoryForm>,
    status: String,
}

impl LookupDraft {
    /// ルックアップ開始
    pub fn begin(&mut self, code: &str) {
        self.form = None;
        let code = code.trim();
        self.status = if code.is_empty() {
            String::new()
        } else {
            format!("Looking up UPC: {}...", code)
        };
    }

    /// 結果を反映する（エラーはそのまま返す）
    pub fn finish(&mut self, result: Result<LookupOutcome>) -> Result<LookupOutcome> {
        match result {
            Ok(outcome) => {
                self.status = outcome.status_message();
                self.form = Some(outcome.form().clone());
                Ok(outcome)
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    pub fn clear(&mut self) {
        self.form = None;
        self.status.clear();
    }

    pub fn form(&self) -> Option<&InventoryForm> {
        self.form.as_ref()
    }

    pub fn has_form(&self) -> bool {
        self.form.is_some()
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

/// 入力コードの検証
///
/// 空なら送信せずに弾く
pub fn validate_code(code: &str) -> Result<&str> {
    let code = code.trim();
    if code.is_empty() {
        return Err(Error::Validation("Please enter a UPC code".into()));
    }
    Ok(code)
}

/// レスポンスをフォームに変換
pub fn outcome_from_envelope(code: &str, envelope: Envelope<LookupPayload>) -> LookupOutcome {
    match (envelope.success, envelope.payload.data) {
        (true, Some(data)) => LookupOutcome::Found(InventoryForm {
            upc: code.to_string(),
            name: data.name,
            caliber: data.caliber,
            count_per_box: data.count_per_box.map(|c| c.to_string()).unwrap_or_default(),
            quantity: DEFAULT_QUANTITY.to_string(),
            notes: String::new(),
        }),
        _ => LookupOutcome::NotFound(InventoryForm {
            upc: code.to_string(),
            quantity: DEFAULT_QUANTITY.to_string(),
            ..Default::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> Envelope<LookupPayload> {
        serde_json::from_str(json).expect("レスポンスのパース失敗")
    }

    #[test]
    fn test_found_populates_draft() {
        let env = envelope(
            r#"{"success": true, "data": {"name": "Test 9mm", "caliber": "9mm", "count_per_box": 50}}"#,
        );
        let outcome = outcome_from_envelope("012345678905", env);

        assert!(!outcome.needs_manual_entry());
        let form = outcome.form();
        assert_eq!(form.upc, "012345678905");
        assert_eq!(form.name, "Test 9mm");
        assert_eq!(form.caliber, "9mm");
        assert_eq!(form.count_per_box, "50");
        assert_eq!(form.quantity, "1");
        assert_eq!(form.notes, "");
        assert_eq!(outcome.status_message(), "UPC found: Test 9mm");
    }

    #[test]
    fn test_not_found_keeps_code_only() {
        let env = envelope(r#"{"success": false, "message": "UPC not found in database"}"#);
        let outcome = outcome_from_envelope("000000000000", env);

        assert!(outcome.needs_manual_entry());
        let form = outcome.into_form();
        assert_eq!(
            form,
            InventoryForm {
                upc: "000000000000".to_string(),
                quantity: "1".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_success_without_data_is_not_found() {
        let outcome = outcome_from_envelope("123", envelope(r#"{"success": true}"#));
        assert!(outcome.needs_manual_entry());
    }

    #[test]
    fn test_failed_lookup_leaves_no_draft() {
        let mut slot = LookupDraft::default();
        slot.begin("012345678905");
        let found = outcome_from_envelope(
            "012345678905",
            envelope(r#"{"success": true, "data": {"name": "Test 9mm", "caliber": "9mm", "count_per_box": 50}}"#),
        );
        assert!(slot.finish(Ok(found)).is_ok());
        assert_eq!(slot.form().map(|f| f.name.as_str()), Some("Test 9mm"));

        // 次のコードが通信失敗しても前の下書きは残らない
        slot.begin("000000000001");
        assert!(!slot.has_form());
        assert_eq!(slot.status(), "Looking up UPC: 000000000001...");

        let err = slot.finish(Err(Error::Transport("connection refused".into()))).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(!slot.has_form());
        assert_eq!(slot.status(), "");
    }

    #[test]
    fn test_not_found_lookup_opens_manual_draft() {
        let mut slot = LookupDraft::default();
        slot.begin(" 000000000000 ");
        let outcome = slot
            .finish(Ok(outcome_from_envelope("000000000000", Envelope::default())))
            .unwrap();
        assert!(outcome.needs_manual_entry());
        assert_eq!(slot.form().map(|f| f.upc.as_str()), Some("000000000000"));
        assert_eq!(slot.status(), "UPC not found: 000000000000");
    }

    #[test]
    fn test_validate_code() {
        assert_eq!(validate_code("  012345678905 ").unwrap(), "012345678905");
        let err = validate_code("   ").unwrap_err();
        assert_eq!(err.to_string(), "Please enter a UPC code");
    }
}
