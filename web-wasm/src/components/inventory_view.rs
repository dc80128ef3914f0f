//! 在庫一覧（絞り込み・編集・削除・グラフ）

use ammo_inventory_common::{distinct_categories, DeleteConfirmation, InventoryItem, RequestGate, TableFilter};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::app::use_app;
use crate::components::delete_confirm::DeleteConfirm;
use crate::components::edit_item_modal::EditItemModal;
use crate::components::stock_chart::StockChart;
use crate::components::threshold_panel::ThresholdPanel;

#[component]
pub fn InventoryView() -> impl IntoView {
    let ctx = use_app();
    let (items, set_items) = signal(Vec::<InventoryItem>::new());
    let (loading, set_loading) = signal(false);
    let (search, set_search) = signal(String::new());
    let (caliber, set_caliber) = signal(String::new());
    let (editing, set_editing) = signal(None::<InventoryItem>);
    let (deleting, set_deleting) = signal(None::<DeleteConfirmation>);
    let (busy, set_busy) = signal(false);
    let gate = StoredValue::new_local(RequestGate::new());

    // 更新系の成功で版数が上がったら取り直す
    Effect::new(move |_| {
        ctx.inventory_version.track();
        let Some(ticket) = gate.try_with_value(|g| g.issue()) else { return };
        set_loading.set(true);
        spawn_local(async move {
            let result = api::client().list_inventory().await;
            let Some(result) = gate.try_with_value(|g| g.accept(ticket, result)).flatten() else {
                return;
            };
            set_loading.set(false);
            match result {
                Ok(rows) => set_items.set(rows),
                Err(e) => ctx.error("Error loading inventory", &e),
            }
        });
    });

    let calibers = Memo::new(move |_| items.with(|rows| distinct_categories(rows)));
    let visible = Memo::new(move |_| {
        let filter = TableFilter::new(search.get(), Some(caliber.get()));
        items.with(|rows| filter.apply(rows).into_iter().cloned().collect::<Vec<_>>())
    });

    let on_delete = move |confirmation: DeleteConfirmation| {
        set_busy.set(true);
        spawn_local(async move {
            let result = api::client().delete_inventory(&confirmation).await;
            set_busy.set(false);
            set_deleting.set(None);
            match result {
                Ok(message) => {
                    ctx.success(message);
                    ctx.reload_inventory();
                }
                Err(e) => ctx.error("Error deleting item", &e),
            }
        });
    };

    view! {
        <section class="inventory-view">
            <h2>"Inventory"</h2>

            <div class="filter-bar">
                <input
                    type="search"
                    placeholder="Search inventory..."
                    prop:value=move || search.get()
                    on:input=move |ev| set_search.set(event_target_value(&ev))
                />
                <select on:change=move |ev| set_caliber.set(event_target_value(&ev))>
                    <option value="">"All calibers"</option>
                    {move || {
                        calibers
                            .get()
                            .into_iter()
                            .map(|c| {
                                let selected = c == caliber.get_untracked();
                                let value = c.clone();
                                view! { <option value=value selected=selected>{c}</option> }
                            })
                            .collect_view()
                    }}
                </select>
                <span class="text-muted">
                    {move || format!("{} of {} items", visible.with(|v| v.len()), items.with(|v| v.len()))}
                </span>
            </div>

            <Show when=move || loading.get()>
                <p class="text-muted">"Loading..."</p>
            </Show>

            <table class="table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Caliber"</th>
                        <th>"Rounds/Box"</th>
                        <th>"Boxes"</th>
                        <th>"Total Rounds"</th>
                        <th>"Notes"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        visible
                            .get()
                            .into_iter()
                            .map(|item| {
                                let edit_target = item.clone();
                                let confirmation = DeleteConfirmation::new(item.id, item.name.clone());
                                view! {
                                    <tr>
                                        <td>{item.name.clone()}</td>
                                        <td>{item.caliber.clone()}</td>
                                        <td>{item.count_per_box}</td>
                                        <td>{item.quantity}</td>
                                        <td>{item.rounds()}</td>
                                        <td>{item.notes.clone()}</td>
                                        <td class="row-actions">
                                            <button
                                                class="btn btn-small btn-secondary"
                                                on:click=move |_| set_editing.set(Some(edit_target.clone()))
                                            >
                                                "Edit"
                                            </button>
                                            <button
                                                class="btn btn-small btn-danger"
                                                on:click=move |_| set_deleting.set(Some(confirmation.clone()))
                                            >
                                                "Delete"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>

            {move || {
                editing
                    .get()
                    .map(|item| view! { <EditItemModal item=item on_close=move |_| set_editing.set(None) /> })
            }}

            {move || {
                deleting
                    .get()
                    .map(|confirmation| {
                        view! {
                            <DeleteConfirm
                                confirmation=confirmation
                                busy=busy
                                on_confirm=on_delete
                                on_cancel=move |_| set_deleting.set(None)
                            />
                        }
                    })
            }}

            <div class="inventory-charts">
                <StockChart items=items />
                <ThresholdPanel calibers=calibers />
            </div>
        </section>
    }
}
