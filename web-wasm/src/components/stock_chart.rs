//! 口径ごとの在庫グラフ（SVG）

use std::collections::BTreeMap;

use ammo_inventory_common::chart::{build_series, caliber_totals, scale_max};
use ammo_inventory_common::{ChartBar, Error, InventoryItem, RequestGate, Thresholds};
use gloo::console;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::app::use_app;

const PLOT_HEIGHT: f64 = 200.0;
const SLOT_WIDTH: f64 = 80.0;
const BAR_WIDTH: f64 = 48.0;

/// 棒1本分の描画位置
struct BarGeometry {
    x: f64,
    y: f64,
    height: f64,
    target_y: f64,
}

fn geometry(index: usize, bar: &ChartBar, max: u64) -> BarGeometry {
    let height = bar.ratio(max) * PLOT_HEIGHT;
    let target_ratio = if max == 0 { 0.0 } else { bar.thresholds.target as f64 / max as f64 };
    BarGeometry {
        x: index as f64 * SLOT_WIDTH + (SLOT_WIDTH - BAR_WIDTH) / 2.0,
        y: PLOT_HEIGHT - height,
        height,
        target_y: PLOT_HEIGHT - target_ratio.min(1.0) * PLOT_HEIGHT,
    }
}

#[component]
pub fn StockChart(items: ReadSignal<Vec<InventoryItem>>) -> impl IntoView {
    let ctx = use_app();
    let (thresholds, set_thresholds) = signal(BTreeMap::<String, Thresholds>::new());
    let gate = StoredValue::new_local(RequestGate::new());

    // 在庫かしきい値が変わったら取り直す
    Effect::new(move |_| {
        ctx.threshold_version.track();
        let calibers: Vec<String> = items.with(|rows| caliber_totals(rows).into_keys().collect());
        let Some(ticket) = gate.try_with_value(|g| g.issue()) else { return };

        spawn_local(async move {
            let client = api::client();
            let mut saved = BTreeMap::new();
            for caliber in calibers {
                match client.get_thresholds(&caliber).await {
                    Ok(t) => {
                        saved.insert(caliber, t);
                    }
                    Err(Error::NotFound(_)) => {}
                    Err(e) => console::warn!("threshold fetch failed:", caliber, e.to_string()),
                }
            }
            if let Some(saved) = gate.try_with_value(|g| g.accept(ticket, saved)).flatten() {
                set_thresholds.set(saved);
            }
        });
    });

    let bars = Memo::new(move |_| {
        let totals = items.with(|rows| caliber_totals(rows));
        thresholds.with(|t| build_series(&totals, t))
    });

    view! {
        <div class="stock-chart">
            <h3>"Stock by Caliber"</h3>
            {move || {
                let bars = bars.get();
                if bars.is_empty() {
                    return view! { <p class="text-muted">"No inventory to chart"</p> }.into_any();
                }
                let max = scale_max(&bars);
                let width = (bars.len() as f64 * SLOT_WIDTH).max(SLOT_WIDTH * 4.0);
                let view_box = format!("0 0 {} {}", width, PLOT_HEIGHT + 40.0);

                view! {
                    <svg class="chart" viewBox=view_box preserveAspectRatio="xMinYMin meet">
                        {bars
                            .iter()
                            .enumerate()
                            .map(|(i, bar)| {
                                let g = geometry(i, bar, max);
                                let center = g.x + BAR_WIDTH / 2.0;
                                let tooltip = format!(
                                    "{}: {} rounds (critical {}, low {}, target {})",
                                    bar.label,
                                    bar.current,
                                    bar.thresholds.critical,
                                    bar.thresholds.low,
                                    bar.thresholds.target,
                                );
                                view! {
                                    <g class=format!("bar bar-{}", bar.level.as_str())>
                                        <title>{tooltip}</title>
                                        <rect
                                            x=g.x.to_string()
                                            y=g.y.to_string()
                                            width=BAR_WIDTH.to_string()
                                            height=g.height.to_string()
                                            fill=bar.color()
                                        />
                                        <line
                                            class="target-line"
                                            x1=(g.x - 4.0).to_string()
                                            x2=(g.x + BAR_WIDTH + 4.0).to_string()
                                            y1=g.target_y.to_string()
                                            y2=g.target_y.to_string()
                                        />
                                        <text class="bar-value" x=center.to_string() y=(g.y - 4.0).to_string()>
                                            {bar.current.to_string()}
                                        </text>
                                        <text class="bar-label" x=center.to_string() y=(PLOT_HEIGHT + 16.0).to_string()>
                                            {bar.label.clone()}
                                        </text>
                                    </g>
                                }
                            })
                            .collect_view()}
                    </svg>
                }
                .into_any()
            }}
            <div class="chart-legend">
                <span class="legend critical">"Critical"</span>
                <span class="legend warning">"Low"</span>
                <span class="legend ok">"OK"</span>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_scales_to_max() {
        let bar = ChartBar::new("9mm Luger", 250, Thresholds::new(100, 200, 500));
        let g = geometry(1, &bar, 500);
        assert_eq!(g.height, 100.0);
        assert_eq!(g.y, 100.0);
        assert_eq!(g.target_y, 0.0);
        assert_eq!(g.x, SLOT_WIDTH + (SLOT_WIDTH - BAR_WIDTH) / 2.0);
    }

    #[test]
    fn test_geometry_empty_scale() {
        let bar = ChartBar::new("x", 0, Thresholds::new(0, 0, 0));
        let g = geometry(0, &bar, 0);
        assert_eq!(g.height, 0.0);
        assert_eq!(g.target_y, PLOT_HEIGHT);
    }
}
