//! UPCデータベース（一覧・追加・編集・削除）

use ammo_inventory_common::{
    distinct_categories, DeleteConfirmation, RequestGate, TableFilter, UpcForm, UpcRecord,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::app::use_app;
use crate::components::delete_confirm::DeleteConfirm;
use crate::components::upc_form::UpcFormView;

/// 開いている編集ダイアログ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Editor {
    Add,
    Edit(u64),
}

#[component]
pub fn UpcView() -> impl IntoView {
    let ctx = use_app();
    let (records, set_records) = signal(Vec::<UpcRecord>::new());
    let (search, set_search) = signal(String::new());
    let (caliber, set_caliber) = signal(String::new());
    let (editor, set_editor) = signal(None::<Editor>);
    let (deleting, set_deleting) = signal(None::<DeleteConfirmation>);
    let (busy, set_busy) = signal(false);
    let form = RwSignal::new(UpcForm::default());
    let gate = StoredValue::new_local(RequestGate::new());

    Effect::new(move |_| {
        ctx.upc_version.track();
        let Some(ticket) = gate.try_with_value(|g| g.issue()) else { return };
        spawn_local(async move {
            let result = api::client().list_upcs().await;
            let Some(result) = gate.try_with_value(|g| g.accept(ticket, result)).flatten() else {
                return;
            };
            match result {
                Ok(rows) => set_records.set(rows),
                Err(e) => ctx.error("Error loading UPC database", &e),
            }
        });
    });

    let calibers = Memo::new(move |_| records.with(|rows| distinct_categories(rows)));
    let visible = Memo::new(move |_| {
        let filter = TableFilter::new(search.get(), Some(caliber.get()));
        records.with(|rows| filter.apply(rows).into_iter().cloned().collect::<Vec<_>>())
    });

    let open_add = move |_| {
        form.set(UpcForm::default());
        set_editor.set(Some(Editor::Add));
    };

    let on_submit = move |submitted: UpcForm| {
        let Some(mode) = editor.get_untracked() else { return };
        set_busy.set(true);
        spawn_local(async move {
            let client = api::client();
            let (result, context) = match mode {
                Editor::Add => (client.add_upc(&submitted).await, "Error adding UPC"),
                Editor::Edit(id) => (client.update_upc(id, &submitted).await, "Error updating UPC"),
            };
            set_busy.set(false);
            match result {
                Ok(message) => {
                    ctx.success(message);
                    ctx.reload_upcs();
                    set_editor.set(None);
                }
                Err(e) => ctx.error(context, &e),
            }
        });
    };

    let on_delete = move |confirmation: DeleteConfirmation| {
        set_busy.set(true);
        spawn_local(async move {
            let result = api::client().delete_upc(&confirmation).await;
            set_busy.set(false);
            set_deleting.set(None);
            match result {
                Ok(message) => {
                    ctx.success(message);
                    ctx.reload_upcs();
                }
                Err(e) => ctx.error("Error deleting UPC", &e),
            }
        });
    };

    view! {
        <section class="upc-view">
            <div class="section-header">
                <h2>"UPC Database"</h2>
                <button class="btn btn-primary" on:click=open_add>"Add UPC"</button>
            </div>

            <div class="filter-bar">
                <input
                    type="search"
                    placeholder="Search UPCs..."
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
            </div>

            <table class="table">
                <thead>
                    <tr>
                        <th>"UPC"</th>
                        <th>"Name"</th>
                        <th>"Caliber"</th>
                        <th>"Rounds/Box"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        visible
                            .get()
                            .into_iter()
                            .map(|record| {
                                let id = record.id;
                                let edit_form = UpcForm::from_record(&record);
                                let label = if record.name.is_empty() { record.upc.clone() } else { record.name.clone() };
                                let confirmation = DeleteConfirmation::new(id, label);
                                view! {
                                    <tr>
                                        <td>{record.upc.clone()}</td>
                                        <td>{record.name.clone()}</td>
                                        <td>{record.caliber.clone()}</td>
                                        <td>{record.count_per_box}</td>
                                        <td class="row-actions">
                                            <button
                                                class="btn btn-small btn-secondary"
                                                on:click=move |_| {
                                                    form.set(edit_form.clone());
                                                    set_editor.set(Some(Editor::Edit(id)));
                                                }
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
                editor
                    .get()
                    .map(|mode| {
                        let (title, label) = match mode {
                            Editor::Add => ("Add UPC", "Add UPC"),
                            Editor::Edit(_) => ("Edit UPC", "Save Changes"),
                        };
                        view! {
                            <div class="modal-backdrop">
                                <div class="modal">
                                    <h3>{title}</h3>
                                    <UpcFormView
                                        form=form
                                        busy=busy
                                        submit_label=label
                                        on_submit=on_submit
                                        on_cancel=move |_| set_editor.set(None)
                                    />
                                </div>
                            </div>
                        }
                    })
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
        </section>
    }
}
