//! 削除確認ダイアログ
//!
//! 対象の表示名をそのまま出し、確定したときだけ `on_confirm` を呼ぶ

use ammo_inventory_common::DeleteConfirmation;
use leptos::prelude::*;

#[component]
pub fn DeleteConfirm<F, C>(
    confirmation: DeleteConfirmation,
    busy: ReadSignal<bool>,
    on_confirm: F,
    on_cancel: C,
) -> impl IntoView
where
    F: Fn(DeleteConfirmation) + 'static + Clone,
    C: Fn(()) + 'static + Clone,
{
    let prompt = confirmation.prompt();

    view! {
        <div class="modal-backdrop">
            <div class="modal">
                <h3>"Confirm Delete"</h3>
                <p class="delete-prompt">{prompt}</p>
                <div class="form-actions">
                    <button
                        class="btn btn-danger"
                        disabled=move || busy.get()
                        on:click={
                            let on_confirm = on_confirm.clone();
                            let confirmation = confirmation.clone();
                            move |_| on_confirm(confirmation.clone())
                        }
                    >
                        "Delete"
                    </button>
                    <button
                        class="btn btn-secondary"
                        on:click={
                            let on_cancel = on_cancel.clone();
                            move |_| on_cancel(())
                        }
                    >
                        "Cancel"
                    </button>
                </div>
            </div>
        </div>
    }
}
