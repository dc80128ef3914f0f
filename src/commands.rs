//! サブコマンドの処理本体
//!
//! 入出力（表示・確認プロンプト）は呼び出し側に任せ、ここでは
//! `InventoryClient` 呼び出しとフォームの組み立てだけを行う。

use std::collections::BTreeMap;
use std::path::Path;

use ammo_inventory_common::chart::{build_series, caliber_totals};
use ammo_inventory_common::{
    ChartBar, DeleteConfirmation, Error, InventoryClient, InventoryForm, InventoryItem,
    LookupOutcome, ProductResult, TableFilter, Transport, UpcForm, UpcRecord,
};
use tracing::{info, warn};

use crate::cli::{FilterArgs, ItemArgs, UpcArgs};
use crate::error::{AppError, Result};

// ============================================
// フォーム組み立て
// ============================================

impl FilterArgs {
    pub fn to_filter(&self) -> TableFilter {
        TableFilter::new(self.search.clone().unwrap_or_default(), self.caliber.clone())
    }
}

fn overlay(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl ItemArgs {
    /// 指定された項目だけフォームに上書きする
    pub fn apply_to(&self, form: &mut InventoryForm) {
        overlay(&mut form.upc, &self.upc);
        overlay(&mut form.name, &self.name);
        overlay(&mut form.caliber, &self.caliber);
        overlay(&mut form.count_per_box, &self.count_per_box);
        overlay(&mut form.quantity, &self.quantity);
        overlay(&mut form.notes, &self.notes);
    }
}

impl UpcArgs {
    pub fn apply_to(&self, form: &mut UpcForm) {
        overlay(&mut form.name, &self.name);
        overlay(&mut form.caliber, &self.caliber);
        overlay(&mut form.count_per_box, &self.count_per_box);
    }
}

/// 追加用の下書き
///
/// `from_upc` があればルックアップ結果を土台にし、フラグで上書きする。
pub async fn draft_item<T: Transport>(
    client: &InventoryClient<T>,
    from_upc: Option<&str>,
    fields: &ItemArgs,
) -> Result<(InventoryForm, Option<LookupOutcome>)> {
    let outcome = match from_upc {
        Some(code) => Some(client.lookup_upc(code).await?),
        None => None,
    };

    let mut form = match &outcome {
        Some(outcome) => outcome.form().clone(),
        None => InventoryForm { quantity: "1".into(), ..Default::default() },
    };
    fields.apply_to(&mut form);
    Ok((form, outcome))
}

// ============================================
// 在庫
// ============================================

pub async fn list_items<T: Transport>(
    client: &InventoryClient<T>,
    filter: &TableFilter,
) -> Result<Vec<InventoryItem>> {
    let items = client.list_inventory().await?;
    Ok(filter.apply(&items).into_iter().cloned().collect())
}

pub async fn find_item<T: Transport>(client: &InventoryClient<T>, id: u64) -> Result<InventoryItem> {
    client
        .list_inventory()
        .await?
        .into_iter()
        .find(|item| item.id == id)
        .ok_or(AppError::ItemNotFound(id))
}

pub async fn update_item<T: Transport>(
    client: &InventoryClient<T>,
    id: u64,
    fields: &ItemArgs,
) -> Result<String> {
    let current = find_item(client, id).await?;
    let mut form = InventoryForm::from_item(&current);
    fields.apply_to(&mut form);
    Ok(client.update_inventory(id, &form).await?)
}

/// 在庫を削除する
///
/// `confirm` が偽を返したらリクエストは送らず `None`
pub async fn delete_item<T, F>(client: &InventoryClient<T>, id: u64, confirm: F) -> Result<Option<String>>
where
    T: Transport,
    F: FnOnce(&DeleteConfirmation) -> Result<bool>,
{
    let item = find_item(client, id).await?;
    let confirmation = DeleteConfirmation::new(item.id, item.name);
    if !confirm(&confirmation)? {
        info!(id, "delete cancelled");
        return Ok(None);
    }
    Ok(Some(client.delete_inventory(&confirmation).await?))
}

// ============================================
// UPC
// ============================================

pub async fn list_upcs<T: Transport>(
    client: &InventoryClient<T>,
    filter: &TableFilter,
) -> Result<Vec<UpcRecord>> {
    let records = client.list_upcs().await?;
    Ok(filter.apply(&records).into_iter().cloned().collect())
}

pub async fn find_upc<T: Transport>(client: &InventoryClient<T>, id: u64) -> Result<UpcRecord> {
    client
        .list_upcs()
        .await?
        .into_iter()
        .find(|record| record.id == id)
        .ok_or(AppError::ItemNotFound(id))
}

pub async fn update_upc<T: Transport>(
    client: &InventoryClient<T>,
    id: u64,
    upc: Option<&str>,
    fields: &UpcArgs,
) -> Result<String> {
    let current = find_upc(client, id).await?;
    let mut form = UpcForm::from_record(&current);
    if let Some(upc) = upc {
        form.upc = upc.to_string();
    }
    fields.apply_to(&mut form);
    Ok(client.update_upc(id, &form).await?)
}

pub async fn delete_upc<T, F>(client: &InventoryClient<T>, id: u64, confirm: F) -> Result<Option<String>>
where
    T: Transport,
    F: FnOnce(&DeleteConfirmation) -> Result<bool>,
{
    let record = find_upc(client, id).await?;
    let label = if record.name.is_empty() { record.upc.clone() } else { record.name.clone() };
    let confirmation = DeleteConfirmation::new(record.id, label);
    if !confirm(&confirmation)? {
        info!(id, "delete cancelled");
        return Ok(None);
    }
    Ok(Some(client.delete_upc(&confirmation).await?))
}

// ============================================
// グラフ
// ============================================

/// 在庫一覧としきい値から棒グラフのデータを作る
///
/// しきい値が取れない口径は既定値で描く
pub async fn load_chart<T: Transport>(client: &InventoryClient<T>) -> Result<Vec<ChartBar>> {
    let items = client.list_inventory().await?;
    let totals = caliber_totals(&items);

    let mut thresholds = BTreeMap::new();
    for caliber in totals.keys() {
        match client.get_thresholds(caliber).await {
            Ok(t) => {
                thresholds.insert(caliber.clone(), t);
            }
            Err(Error::NotFound(_)) => {}
            Err(e) => warn!(%caliber, error = %e, "threshold fetch failed, using defaults"),
        }
    }
    Ok(build_series(&totals, &thresholds))
}

// ============================================
// CSV・検索
// ============================================

/// CSVをダウンロードしてファイルに保存
pub async fn download_to<T: Transport>(client: &InventoryClient<T>, path: &str, output: &Path) -> Result<usize> {
    let body = client.download(path).await?;
    std::fs::write(output, &body)?;
    Ok(body.len())
}

pub async fn import_file<T: Transport>(
    client: &InventoryClient<T>,
    file: &Path,
) -> Result<ammo_inventory_common::ImportReport> {
    if !file.exists() {
        return Err(AppError::FileNotFound(file.display().to_string()));
    }
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let bytes = std::fs::read(file)?;
    Ok(client.import_csv(&file_name, bytes).await?)
}

/// 検索結果のN番目（1始まり）をUPCデータベースに登録
pub async fn import_result<T: Transport>(
    client: &InventoryClient<T>,
    results: &[ProductResult],
    index: usize,
) -> Result<String> {
    let product = index
        .checked_sub(1)
        .and_then(|i| results.get(i))
        .ok_or(AppError::NoSuchResult { index, count: results.len() })?;
    Ok(client.import_product(product).await?)
}

/// エクスポートの既定ファイル名
pub fn default_export_name(date: chrono::NaiveDate) -> String {
    format!("ammo_inventory_{}.csv", date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_args_overlay_only_given_fields() {
        let mut form = InventoryForm {
            name: "Federal 9mm FMJ".into(),
            quantity: "4".into(),
            ..Default::default()
        };
        let args = ItemArgs { quantity: Some("6".into()), ..Default::default() };
        args.apply_to(&mut form);
        assert_eq!(form.name, "Federal 9mm FMJ");
        assert_eq!(form.quantity, "6");
    }

    #[test]
    fn test_default_export_name() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(default_export_name(date), "ammo_inventory_20240309.csv");
    }

    #[test]
    fn test_filter_args_empty_is_inactive() {
        assert!(!FilterArgs::default().to_filter().is_active());
    }
}
