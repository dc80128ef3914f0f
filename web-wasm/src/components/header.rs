//! ヘッダー・タブ切り替え

use leptos::prelude::*;

use crate::app::{use_app, Tab};

#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_app();

    view! {
        <header class="header">
            <h1>"Ammo Inventory"</h1>
            <nav class="tabs">
                {Tab::ALL
                    .into_iter()
                    .map(|tab| {
                        view! {
                            <button
                                class="tab"
                                class:active=move || ctx.tab.get() == tab
                                on:click=move |_| ctx.show(tab)
                            >
                                {tab.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
        </header>
    }
}
