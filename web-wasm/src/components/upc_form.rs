//! UPCカタログの入力フォーム（追加・編集で共用）

use ammo_inventory_common::UpcForm;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;

#[component]
pub fn UpcFormView<F, C>(
    form: RwSignal<UpcForm>,
    busy: ReadSignal<bool>,
    submit_label: &'static str,
    on_submit: F,
    on_cancel: C,
) -> impl IntoView
where
    F: Fn(UpcForm) + 'static + Clone,
    C: Fn(()) + 'static + Clone,
{
    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        on_submit(form.get_untracked());
    };

    view! {
        <form class="upc-form" on:submit=submit>
            <div class="form-group">
                <label>"UPC"</label>
                <input
                    type="text"
                    required=true
                    prop:value=move || form.with(|f| f.upc.clone())
                    on:input=move |ev| form.update(|f| f.upc = event_target_value(&ev))
                />
            </div>
            <div class="form-group">
                <label>"Name"</label>
                <input
                    type="text"
                    prop:value=move || form.with(|f| f.name.clone())
                    on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                />
            </div>
            <div class="form-group">
                <label>"Caliber"</label>
                <input
                    type="text"
                    prop:value=move || form.with(|f| f.caliber.clone())
                    on:input=move |ev| form.update(|f| f.caliber = event_target_value(&ev))
                />
            </div>
            <div class="form-group">
                <label>"Rounds per box"</label>
                <input
                    type="number"
                    prop:value=move || form.with(|f| f.count_per_box.clone())
                    on:input=move |ev| form.update(|f| f.count_per_box = event_target_value(&ev))
                />
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
