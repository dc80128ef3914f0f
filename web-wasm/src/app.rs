//! メインアプリケーションコンポーネント

use ammo_inventory_common::{Error, ImportReport, NoticeBoard};
use gloo::console;
use leptos::prelude::*;

use crate::components::{
    csv_panel::CsvPanel,
    header::Header,
    inventory_view::InventoryView,
    notice_area::NoticeArea,
    product_search::ProductSearch,
    scan_panel::ScanPanel,
    upc_view::UpcView,
};

/// 表示中のタブ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Scan,
    Inventory,
    Upcs,
    Search,
    Csv,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Scan, Tab::Inventory, Tab::Upcs, Tab::Search, Tab::Csv];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Scan => "Scan",
            Tab::Inventory => "Inventory",
            Tab::Upcs => "UPC Database",
            Tab::Search => "Product Search",
            Tab::Csv => "Import / Export",
        }
    }
}

/// 画面全体で共有するシグナル
///
/// 更新系の成功時は対象コレクションの版数だけを上げ、そのコレクションを
/// 表示しているコンポーネントが再取得する。
#[derive(Clone, Copy)]
pub struct AppContext {
    pub inventory_version: ReadSignal<u32>,
    set_inventory_version: WriteSignal<u32>,
    pub upc_version: ReadSignal<u32>,
    set_upc_version: WriteSignal<u32>,
    pub threshold_version: ReadSignal<u32>,
    set_threshold_version: WriteSignal<u32>,
    pub notices: ReadSignal<NoticeBoard>,
    set_notices: WriteSignal<NoticeBoard>,
    pub tab: ReadSignal<Tab>,
    set_tab: WriteSignal<Tab>,
}

impl AppContext {
    pub fn new() -> Self {
        let (inventory_version, set_inventory_version) = signal(0u32);
        let (upc_version, set_upc_version) = signal(0u32);
        let (threshold_version, set_threshold_version) = signal(0u32);
        let (notices, set_notices) = signal(NoticeBoard::new());
        let (tab, set_tab) = signal(Tab::Scan);

        Self {
            inventory_version,
            set_inventory_version,
            upc_version,
            set_upc_version,
            threshold_version,
            set_threshold_version,
            notices,
            set_notices,
            tab,
            set_tab,
        }
    }

    pub fn reload_inventory(&self) {
        self.set_inventory_version.update(|v| *v += 1);
    }

    pub fn reload_upcs(&self) {
        self.set_upc_version.update(|v| *v += 1);
    }

    pub fn reload_thresholds(&self) {
        self.set_threshold_version.update(|v| *v += 1);
    }

    pub fn show(&self, tab: Tab) {
        self.set_tab.set(tab);
    }

    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        self.set_notices.update(|board| {
            board.success(message);
        });
    }

    pub fn warning(&self, message: impl Into<String>) {
        let message = message.into();
        self.set_notices.update(|board| {
            board.warning(message);
        });
    }

    /// 失敗を通知に出す（ページは止めない）
    pub fn error(&self, context: &str, error: &Error) {
        console::error!(context, error.to_string());
        self.set_notices.update(|board| {
            board.error(context, error);
        });
    }

    /// 取り込み結果は成功メッセージと行エラーを同時に出す
    pub fn publish_import(&self, report: &ImportReport) {
        self.set_notices.update(|board| {
            report.publish(board);
        });
    }

    pub fn dismiss(&self, id: u64) {
        self.set_notices.update(|board| board.dismiss(id));
    }
}

pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    view! {
        <div class="container">
            <Header />
            <NoticeArea />

            // タブを離れるとスキャナも破棄され、カメラは解放される
            {move || match ctx.tab.get() {
                Tab::Scan => view! { <ScanPanel /> }.into_any(),
                Tab::Inventory => view! { <InventoryView /> }.into_any(),
                Tab::Upcs => view! { <UpcView /> }.into_any(),
                Tab::Search => view! { <ProductSearch /> }.into_any(),
                Tab::Csv => view! { <CsvPanel /> }.into_any(),
            }}
        </div>
    }
}
