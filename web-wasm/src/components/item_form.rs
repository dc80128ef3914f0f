//! 在庫入力フォーム（追加・編集で共用）

use ammo_inventory_common::InventoryForm;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;

/// 入力欄1つ分
#[component]
fn Field<G, S>(label: &'static str, input_type: &'static str, get: G, set: S) -> impl IntoView
where
    G: Fn() -> String + Send + Sync + 'static,
    S: Fn(String) + 'static,
{
    view! {
        <div class="form-group">
            <label>{label}</label>
            <input
                type=input_type
                prop:value=get
                on:input=move |ev| set(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
pub fn ItemForm<F, C>(
    form: RwSignal<InventoryForm>,
    busy: ReadSignal<bool>,
    submit_label: &'static str,
    on_submit: F,
    on_cancel: C,
) -> impl IntoView
where
    F: Fn(InventoryForm) + 'static + Clone,
    C: Fn(()) + 'static + Clone,
{
    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        on_submit(form.get_untracked());
    };

    view! {
        <form class="item-form" on:submit=submit>
            <Field
                label="UPC"
                input_type="text"
                get=move || form.with(|f| f.upc.clone())
                set=move |v| form.update(|f| f.upc = v)
            />
            <Field
                label="Name"
                input_type="text"
                get=move || form.with(|f| f.name.clone())
                set=move |v| form.update(|f| f.name = v)
            />
            <Field
                label="Caliber"
                input_type="text"
                get=move || form.with(|f| f.caliber.clone())
                set=move |v| form.update(|f| f.caliber = v)
            />
            <Field
                label="Rounds per box"
                input_type="number"
                get=move || form.with(|f| f.count_per_box.clone())
                set=move |v| form.update(|f| f.count_per_box = v)
            />
            <Field
                label="Quantity (boxes)"
                input_type="number"
                get=move || form.with(|f| f.quantity.clone())
                set=move |v| form.update(|f| f.quantity = v)
            />
            <div class="form-group">
                <label>"Notes"</label>
                <textarea
                    prop:value=move || form.with(|f| f.notes.clone())
                    on:input=move |ev| form.update(|f| f.notes = event_target_value(&ev))
                ></textarea>
            </div>

            <div class="form-actions">
                <button type="submit" class="btn btn-primary" disabled=move || busy.get()>
                    {submit_label}
                </button>
                <button
                    type="button"
                    class="btn btn-secondary"
                    on:click={
                        let on_cancel = on_cancel.clone();
                        move |_| on_cancel(())
                    }
                >
                    "Cancel"
                </button>
            </div>
        </form>
    }
}
