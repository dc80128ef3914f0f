//! 在庫グラフのデータ
//!
//! 口径ごとの総弾数をしきい値と比べて色分けする。描画はUI側。

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{InventoryItem, Thresholds};

/// 在庫レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Critical,
    Warning,
    Ok,
}

impl StockLevel {
    /// 判定順: `current ≤ critical` → Critical、`current ≤ low` → Warning、それ以外 Ok
    pub fn classify(current: u64, critical: u64, low: u64) -> Self {
        if current <= critical {
            StockLevel::Critical
        } else if current <= low {
            StockLevel::Warning
        } else {
            StockLevel::Ok
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            StockLevel::Critical => "#dc3545",
            StockLevel::Warning => "#ffc107",
            StockLevel::Ok => "#28a745",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockLevel::Critical => "critical",
            StockLevel::Warning => "warning",
            StockLevel::Ok => "ok",
        }
    }
}

/// 棒1本
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBar {
    pub label: String,
    pub current: u64,
    pub thresholds: Thresholds,
    pub level: StockLevel,
}

impl ChartBar {
    pub fn new(label: impl Into<String>, current: u64, thresholds: Thresholds) -> Self {
        Self {
            label: label.into(),
            current,
            level: StockLevel::classify(current, thresholds.critical, thresholds.low),
            thresholds,
        }
    }

    pub fn color(&self) -> &'static str {
        self.level.color()
    }

    /// スケール最大値に対する割合（0.0〜1.0）
    pub fn ratio(&self, scale_max: u64) -> f64 {
        if scale_max == 0 {
            0.0
        } else {
            (self.current as f64 / scale_max as f64).min(1.0)
        }
    }
}

/// ラベル・現在値・しきい値の並びから棒を作る
pub fn bars<I, S>(series: I) -> Vec<ChartBar>
where
    I: IntoIterator<Item = (S, u64, Thresholds)>,
    S: Into<String>,
{
    series
        .into_iter()
        .map(|(label, current, thresholds)| ChartBar::new(label, current, thresholds))
        .collect()
}

/// 縦軸の最大値（現在値と目標値の最大）
pub fn scale_max(bars: &[ChartBar]) -> u64 {
    bars.iter()
        .map(|b| b.current.max(b.thresholds.target))
        .max()
        .unwrap_or(0)
}

/// サーバーにしきい値がない場合の既定値
pub fn default_thresholds(caliber: &str) -> Thresholds {
    match caliber {
        "9mm Luger" => Thresholds::new(100, 200, 500),
        ".223 Remington" | "5.56 NATO" => Thresholds::new(60, 150, 400),
        ".45 ACP" => Thresholds::new(50, 100, 300),
        ".22 LR" => Thresholds::new(150, 300, 1000),
        "12 Gauge" => Thresholds::new(25, 50, 200),
        _ => Thresholds::new(50, 100, 500),
    }
}

/// 口径ごとの総弾数
pub fn caliber_totals(items: &[InventoryItem]) -> BTreeMap<String, u64> {
    let mut totals = BTreeMap::new();
    for item in items {
        // 負の在庫はグラフ上 0 として扱う
        *totals.entry(item.caliber.clone()).or_insert(0) += u64::try_from(item.rounds()).unwrap_or(0);
    }
    totals
}

/// 総弾数としきい値を組み合わせる
///
/// `thresholds` にない口径は `default_thresholds` を使う
pub fn build_series(
    totals: &BTreeMap<String, u64>,
    thresholds: &BTreeMap<String, Thresholds>,
) -> Vec<ChartBar> {
    bars(totals.iter().map(|(caliber, total)| {
        let t = thresholds
            .get(caliber)
            .copied()
            .unwrap_or_else(|| default_thresholds(caliber));
        (caliber.clone(), *total, t)
    }))
}
