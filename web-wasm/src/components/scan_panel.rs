//! バーコードスキャン・UPCルックアップ・在庫追加

use ammo_inventory_common::lookup::NOT_FOUND_MESSAGE;
use ammo_inventory_common::{InventoryForm, LookupDraft, RequestGate, ScanState};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::app::{use_app, Tab};
use crate::components::item_form::ItemForm;
use crate::scanner::{ScanView, Scanner};

const SCANNER_TARGET: &str = "scanner";

#[component]
pub fn ScanPanel() -> impl IntoView {
    let ctx = use_app();

    let (scan_view, set_scan_view) = signal(ScanView::default());
    let (manual_code, set_manual_code) = signal(String::new());
    let slot = RwSignal::new(LookupDraft::default());
    let (busy, set_busy) = signal(false);
    let draft = RwSignal::new(InventoryForm::default());
    let lookup_gate = StoredValue::new_local(RequestGate::new());

    // 後発のルックアップが先発を無効にする
    let lookup = move |code: String| {
        let Some(ticket) = lookup_gate.try_with_value(|g| g.issue()) else { return };
        slot.update(|s| s.begin(&code));
        spawn_local(async move {
            let result = api::client().lookup_upc(&code).await;
            let Some(result) = lookup_gate.try_with_value(|g| g.accept(ticket, result)).flatten() else {
                return;
            };
            match slot.try_update(|s| s.finish(result)) {
                Some(Ok(outcome)) => {
                    if outcome.needs_manual_entry() {
                        ctx.warning(NOT_FOUND_MESSAGE);
                    }
                    draft.set(outcome.into_form());
                }
                Some(Err(e)) => ctx.error("Error looking up UPC", &e),
                None => {}
            }
        });
    };

    let scanner = StoredValue::new_local(Scanner::new(
        SCANNER_TARGET,
        move |view| set_scan_view.set(view),
        lookup,
        move |e| ctx.error("", &e),
    ));

    let on_start = move |_| {
        slot.update(|s| s.clear());
        scanner.with_value(|s| s.start());
    };

    let on_reset = move |_| {
        scanner.with_value(|s| s.reset());
        slot.update(|s| s.clear());
    };

    let manual_lookup = move || {
        scanner.with_value(|s| s.reset());
        lookup(manual_code.get_untracked());
    };

    let on_submit = move |form: InventoryForm| {
        set_busy.set(true);
        spawn_local(async move {
            let result = api::client().add_inventory(&form).await;
            set_busy.set(false);
            match result {
                Ok(_) => {
                    ctx.success("Ammunition added to inventory!");
                    ctx.reload_inventory();
                    slot.update(|s| s.clear());
                    set_manual_code.set(String::new());
                    ctx.show(Tab::Inventory);
                }
                // 入力内容はそのまま残す
                Err(e) => ctx.error("Error adding to inventory", &e),
            }
        });
    };

    let on_cancel = move |_| slot.update(|s| s.clear());

    let is_active = move || scan_view.with(|v| v.is_active());

    view! {
        <section class="scan-panel">
            <h2>"Scan Barcode"</h2>

            <div class="scan-controls">
                <Show
                    when=is_active
                    fallback=move || view! {
                        <button class="btn btn-primary" on:click=on_start>"Start Scanner"</button>
                    }
                >
                    <button class="btn btn-secondary" on:click=on_reset>"Reset"</button>
                </Show>
            </div>

            <div
                id=SCANNER_TARGET
                class="scanner-container"
                class:hidden=move || !is_active()
            >
                <div class="scanning-area">
                    <div class="scanner-line"></div>
                </div>
            </div>

            <p
                class="scan-message"
                class:error=move || scan_view.with(|v| matches!(v.state, ScanState::Error(_)))
            >
                {move || scan_view.with(|v| v.message.clone())}
            </p>

            <div class="manual-entry">
                <label for="manual-upc">"Or enter UPC manually"</label>
                <div class="input-group">
                    <input
                        type="text"
                        id="manual-upc"
                        placeholder="UPC code"
                        prop:value=move || manual_code.get()
                        on:input=move |ev| set_manual_code.set(event_target_value(&ev))
                        on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                ev.prevent_default();
                                manual_lookup();
                            }
                        }
                    />
                    <button class="btn btn-primary" on:click=move |_| manual_lookup()>"Lookup"</button>
                </div>
            </div>

            <p class="lookup-status">{move || slot.with(|s| s.status().to_string())}</p>

            <Show when=move || slot.with(|s| s.has_form())>
                <div class="scan-results">
                    <h3>"Add to Inventory"</h3>
                    <ItemForm
                        form=draft
                        busy=busy
                        submit_label="Add to Inventory"
                        on_submit=on_submit
                        on_cancel=on_cancel
                    />
                </div>
            </Show>
        </section>
    }
}
