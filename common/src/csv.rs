//! CSV の取り込み・書き出し
//!
//! 書き出しとテンプレートはサーバーのダウンロードURLへの遷移のみ。
//! 取り込みは送信前にファイル名を確認し、結果は成功メッセージと
//! 行ごとのエラーを同時に通知する。

use crate::api::{paths, Envelope, ImportPayload};
use crate::error::{Error, Result};
use crate::notice::{NoticeBoard, NoticeLevel};

/// 取り込みで期待するヘッダ
pub const EXPECTED_HEADER: &str = "name,upc,caliber,count_per_box,quantity,notes";

/// multipart のフィールド名
pub const FILE_FIELD: &str = "file";

/// 在庫CSVのダウンロード先（`base_url` は同一オリジンなら空文字）
pub fn export_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), paths::EXPORT_CSV)
}

/// 取り込み用テンプレートのダウンロード先
pub fn template_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), paths::CSV_TEMPLATE)
}

/// 送信前のファイル名チェック（サーバーと同じ条件）
pub fn validate_import_file(file_name: &str) -> Result<()> {
    if file_name.trim().is_empty() {
        return Err(Error::Validation("No file selected".into()));
    }
    if !file_name.to_lowercase().ends_with(".csv") {
        return Err(Error::Validation("File must be a CSV".into()));
    }
    Ok(())
}

/// 取り込み結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub message: String,
    /// 行単位のエラー（取り込み自体は成功していても入る）
    pub errors: Vec<String>,
}

impl ImportReport {
    /// レスポンスから作る。`success:false` は拒否エラー
    pub fn from_envelope(envelope: Envelope<ImportPayload>) -> Result<Self> {
        if !envelope.success {
            return Err(Error::Rejected(
                envelope.message.unwrap_or_else(|| "Import failed".to_string()),
            ));
        }
        Ok(Self {
            message: envelope.message.unwrap_or_default(),
            errors: envelope.payload.errors.unwrap_or_default(),
        })
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 成功メッセージと各行エラーを並べて通知する（置き換えない）
    pub fn publish(&self, board: &mut NoticeBoard) -> Vec<u64> {
        let mut ids = Vec::with_capacity(1 + self.errors.len());
        if !self.message.is_empty() {
            ids.push(board.push(NoticeLevel::Success, self.message.clone()));
        }
        for error in &self.errors {
            ids.push(board.push(NoticeLevel::Warning, error.clone()));
        }
        ids
    }
}
