//! 在庫編集ダイアログ

use ammo_inventory_common::{InventoryForm, InventoryItem};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::app::use_app;
use crate::components::item_form::ItemForm;

#[component]
pub fn EditItemModal<C>(item: InventoryItem, on_close: C) -> impl IntoView
where
    C: Fn(()) + 'static + Clone + Send + Sync,
{
    let ctx = use_app();
    let id = item.id;
    let form = RwSignal::new(InventoryForm::from_item(&item));
    let (busy, set_busy) = signal(false);

    let on_submit = {
        let on_close = on_close.clone();
        move |form: InventoryForm| {
            let on_close = on_close.clone();
            set_busy.set(true);
            spawn_local(async move {
                let result = api::client().update_inventory(id, &form).await;
                set_busy.set(false);
                match result {
                    Ok(message) => {
                        ctx.success(message);
                        ctx.reload_inventory();
                        on_close(());
                    }
                    // ダイアログは開いたまま
                    Err(e) => ctx.error("Error updating inventory", &e),
                }
            });
        }
    };

    view! {
        <div class="modal-backdrop">
            <div class="modal">
                <h3>{format!("Edit {}", item.name)}</h3>
                <ItemForm
                    form=form
                    busy=busy
                    submit_label="Save Changes"
                    on_submit=on_submit
                    on_cancel=on_close
                />
            </div>
        </div>
    }
}
