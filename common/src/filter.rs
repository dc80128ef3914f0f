//! テーブルの絞り込み
//!
//! 読み込み済みの行に対する純粋な述語。検索文字列（表示列の部分一致、
//! 大文字小文字を区別しない）と口径（完全一致、未選択なら全件）の AND。

use std::collections::BTreeSet;

use crate::types::{InventoryItem, UpcRecord};

/// 絞り込み対象の行
pub trait FilterRow {
    /// 検索対象の表示列
    fn searchable_columns(&self) -> Vec<String>;

    /// 口径フィルタと比較する値
    fn category(&self) -> &str;
}

impl FilterRow for InventoryItem {
    fn searchable_columns(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.caliber.clone(),
            self.count_per_box.to_string(),
            self.quantity.to_string(),
            self.rounds().to_string(),
            self.notes.clone(),
        ]
    }

    fn category(&self) -> &str {
        &self.caliber
    }
}

impl FilterRow for UpcRecord {
    fn searchable_columns(&self) -> Vec<String> {
        vec![
            self.upc.clone(),
            self.name.clone(),
            self.caliber.clone(),
            self.count_per_box.to_string(),
        ]
    }

    fn category(&self) -> &str {
        &self.caliber
    }
}

/// 検索条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    pub text: String,
    /// 空文字は未選択扱い
    pub category: Option<String>,
}

impl TableFilter {
    pub fn new(text: impl Into<String>, category: Option<String>) -> Self {
        Self { text: text.into(), category }
    }

    /// 検索文字列の条件
    pub fn matches_text<R: FilterRow>(&self, row: &R) -> bool {
        let needle = self.text.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        row.searchable_columns()
            .iter()
            .any(|column| column.to_lowercase().contains(&needle))
    }

    /// 口径の条件
    pub fn matches_category<R: FilterRow>(&self, row: &R) -> bool {
        match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => row.category() == category,
        }
    }

    pub fn matches<R: FilterRow>(&self, row: &R) -> bool {
        self.matches_text(row) && self.matches_category(row)
    }

    /// 表示する行だけを返す（順序は維持）
    pub fn apply<'a, R: FilterRow>(&self, rows: &'a [R]) -> Vec<&'a R> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }

    pub fn is_active(&self) -> bool {
        !self.text.is_empty() || self.category.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// 口径ドロップダウン用の一覧（重複なし・昇順）
pub fn distinct_categories<R: FilterRow>(rows: &[R]) -> Vec<String> {
    rows.iter()
        .map(|row| row.category().to_string())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
