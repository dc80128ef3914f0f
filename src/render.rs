//! 端末向けの表・グラフ表示

use ammo_inventory_common::chart::scale_max;
use ammo_inventory_common::{ChartBar, InventoryItem, ProductResult, StockLevel, UpcRecord};

/// 棒グラフの最大幅（文字数）
pub const BAR_WIDTH: usize = 40;

/// 列幅を揃えた表
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.iter().map(|h| h.to_string()).collect())];
    out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    out.extend(rows.iter().map(|row| line(row.clone())));
    out.join("\n")
}

pub fn inventory_table(items: &[InventoryItem]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            vec![
                item.id.to_string(),
                item.name.clone(),
                item.caliber.clone(),
                item.count_per_box.to_string(),
                item.quantity.to_string(),
                item.rounds().to_string(),
                item.notes.clone(),
            ]
        })
        .collect();
    table(&["ID", "Name", "Caliber", "Per box", "Boxes", "Rounds", "Notes"], &rows)
}

pub fn upc_table(records: &[UpcRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.upc.clone(),
                r.name.clone(),
                r.caliber.clone(),
                r.count_per_box.to_string(),
            ]
        })
        .collect();
    table(&["ID", "UPC", "Name", "Caliber", "Per box"], &rows)
}

/// 検索結果（番号は1始まり、`--import N` と対応）
pub fn product_list(products: &[ProductResult]) -> String {
    products
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut lines = vec![format!("{}. {}", i + 1, p.name)];
            lines.push(format!(
                "   UPC: {}  Caliber: {}  Per box: {}  {}",
                p.upc.as_deref().unwrap_or("-"),
                p.caliber.as_deref().unwrap_or("-"),
                p.count_per_box.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
                p.price_label(),
            ));
            if !p.url.is_empty() {
                lines.push(format!("   {}", p.url));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn level_mark(level: StockLevel) -> &'static str {
    match level {
        StockLevel::Critical => "!!",
        StockLevel::Warning => "! ",
        StockLevel::Ok => "  ",
    }
}

/// 横棒グラフ（目標値の位置に `|`）
pub fn chart(bars: &[ChartBar]) -> String {
    let max = scale_max(bars);
    let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    let cell = |value: u64| -> usize {
        if max == 0 {
            0
        } else {
            ((value.min(max) as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
        }
    };

    bars.iter()
        .map(|bar| {
            let filled = (bar.ratio(max) * BAR_WIDTH as f64).round() as usize;
            let target = cell(bar.thresholds.target);
            let track: String = (0..=BAR_WIDTH)
                .map(|i| match (i < filled, i == target) {
                    (_, true) => '|',
                    (true, false) => '#',
                    (false, false) => ' ',
                })
                .collect();
            format!(
                "{} {:<lw$} {} {:>6} ({})",
                level_mark(bar.level),
                bar.label,
                track,
                bar.current,
                bar.level.as_str(),
                lw = label_width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
