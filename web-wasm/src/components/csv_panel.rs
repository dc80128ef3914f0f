//! CSVの書き出し・テンプレート・取り込み

use ammo_inventory_common::csv::{export_url, template_url, validate_import_file, EXPECTED_HEADER};
use ammo_inventory_common::Error;
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen_futures::JsFuture;

use crate::api;
use crate::api::fetch::js_error_message;
use crate::app::use_app;

/// 選択中のファイルを読み込む
async fn read_file(file: web_sys::File) -> Result<(String, Vec<u8>), Error> {
    let name = file.name();
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| Error::Transport(js_error_message(&e)))?;
    Ok((name, js_sys::Uint8Array::new(&buffer).to_vec()))
}

#[component]
pub fn CsvPanel() -> impl IntoView {
    let ctx = use_app();
    let file_input: NodeRef<Input> = NodeRef::new();
    let (importing, set_importing) = signal(false);

    let on_import = move |_| {
        let file = file_input
            .get()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        let Some(file) = file else {
            // 送信せず "No file selected"
            if let Err(e) = validate_import_file("") {
                ctx.error("", &e);
            }
            return;
        };

        set_importing.set(true);
        spawn_local(async move {
            let result = match read_file(file).await {
                Ok((name, bytes)) => api::client().import_csv(&name, bytes).await,
                Err(e) => Err(e),
            };
            set_importing.set(false);
            match result {
                Ok(report) => {
                    ctx.publish_import(&report);
                    ctx.reload_inventory();
                    if let Some(input) = file_input.get_untracked() {
                        input.set_value("");
                    }
                }
                Err(e) => ctx.error("Error importing CSV", &e),
            }
        });
    };

    view! {
        <section class="csv-panel">
            <h2>"Import / Export"</h2>

            <div class="csv-export">
                <h3>"Export"</h3>
                <a class="btn btn-secondary" href=export_url("") download="">"Download Inventory CSV"</a>
                <a class="btn btn-tertiary" href=template_url("") download="">"Download Template"</a>
            </div>

            <div class="csv-import">
                <h3>"Import"</h3>
                <p class="text-muted">{format!("Expected columns: {}", EXPECTED_HEADER)}</p>
                <input type="file" accept=".csv" node_ref=file_input />
                <button class="btn btn-primary" disabled=move || importing.get() on:click=on_import>
                    {move || if importing.get() { "Importing..." } else { "Import CSV" }}
                </button>
            </div>
        </section>
    }
}
