//! オンラインショップの商品検索・UPCデータベースへの取り込み

use ammo_inventory_common::{ProductResult, RequestGate, DEFAULT_MAX_PRODUCTS};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::app::use_app;

#[component]
pub fn ProductSearch() -> impl IntoView {
    let ctx = use_app();
    let (query, set_query) = signal(String::new());
    let (max_products, set_max_products) = signal(DEFAULT_MAX_PRODUCTS);
    let (results, set_results) = signal(Vec::<ProductResult>::new());
    let (searched, set_searched) = signal(false);
    let (searching, set_searching) = signal(false);
    let gate = StoredValue::new_local(RequestGate::new());

    let search = move || {
        let Some(ticket) = gate.try_with_value(|g| g.issue()) else { return };
        let text = query.get_untracked();
        let max = max_products.get_untracked();
        set_searching.set(true);
        spawn_local(async move {
            let result = api::client().search_products(&text, max).await;
            let Some(result) = gate.try_with_value(|g| g.accept(ticket, result)).flatten() else {
                return;
            };
            set_searching.set(false);
            match result {
                Ok(found) => {
                    set_results.set(found);
                    set_searched.set(true);
                }
                Err(e) => ctx.error("Search failed", &e),
            }
        });
    };

    let import = move |product: ProductResult| {
        spawn_local(async move {
            match api::client().import_product(&product).await {
                Ok(message) => {
                    ctx.success(message);
                    ctx.reload_upcs();
                }
                Err(e) => ctx.error("Error importing UPC", &e),
            }
        });
    };

    view! {
        <section class="product-search">
            <h2>"Product Search"</h2>
            <form
                class="search-form"
                on:submit=move |ev: leptos::ev::SubmitEvent| {
                    ev.prevent_default();
                    search();
                }
            >
                <input
                    type="search"
                    placeholder="e.g. 9mm 115gr FMJ"
                    prop:value=move || query.get()
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                />
                <select on:change=move |ev| {
                    let value = event_target_value(&ev).parse().unwrap_or(DEFAULT_MAX_PRODUCTS);
                    set_max_products.set(value);
                }>
                    {[5u32, 10, 20]
                        .into_iter()
                        .map(|n| view! { <option value=n.to_string() selected={n == DEFAULT_MAX_PRODUCTS}>{format!("{} results", n)}</option> })
                        .collect_view()}
                </select>
                <button type="submit" class="btn btn-primary" disabled=move || searching.get()>
                    {move || if searching.get() { "Searching..." } else { "Search" }}
                </button>
            </form>

            <Show when=move || searched.get() && results.with(|r| r.is_empty())>
                <p class="text-muted">"No products found"</p>
            </Show>

            <div class="product-results">
                {move || {
                    results
                        .get()
                        .into_iter()
                        .map(|product| {
                            let can_import = product.upc.is_some();
                            let target = product.clone();
                            view! {
                                <div class="product-card">
                                    {product
                                        .image_url
                                        .clone()
                                        .map(|src| view! { <img class="product-image" src=src alt="" /> })}
                                    <div class="product-body">
                                        <h4>
                                            <a href=product.url.clone() target="_blank" rel="noopener noreferrer">
                                                {product.name.clone()}
                                            </a>
                                        </h4>
                                        <p class="product-meta">
                                            {format!(
                                                "UPC: {} · Caliber: {} · Per box: {}",
                                                product.upc.as_deref().unwrap_or("-"),
                                                product.caliber.as_deref().unwrap_or("-"),
                                                product.count_per_box.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
                                            )}
                                        </p>
                                        <p class="product-price">{product.price_label().to_string()}</p>
                                        {product.description.clone().map(|d| view! { <p class="product-description">{d}</p> })}
                                        <button
                                            class="btn btn-small btn-primary"
                                            disabled={!can_import}
                                            on:click=move |_| import(target.clone())
                                        >
                                            "Add to UPC Database"
                                        </button>
                                    </div>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>
        </section>
    }
}
