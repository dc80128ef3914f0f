//! 閉じられる通知の一覧

use leptos::prelude::*;

use crate::app::use_app;

#[component]
pub fn NoticeArea() -> impl IntoView {
    let ctx = use_app();

    view! {
        <div class="notice-area">
            {move || {
                ctx.notices
                    .get()
                    .notices()
                    .iter()
                    .map(|notice| {
                        let id = notice.id;
                        view! {
                            <div class=format!("alert alert-{}", notice.level.as_str())>
                                <span>{notice.message.clone()}</span>
                                <button class="close" on:click=move |_| ctx.dismiss(id)>"×"</button>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
