//! 口径ごとのしきい値設定

use ammo_inventory_common::chart::default_thresholds;
use ammo_inventory_common::{Error, RequestGate, ThresholdForm};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::app::use_app;

#[component]
pub fn ThresholdPanel(calibers: Memo<Vec<String>>) -> impl IntoView {
    let ctx = use_app();
    let (caliber, set_caliber) = signal(String::new());
    let (source, set_source) = signal("");
    let (busy, set_busy) = signal(false);
    let form = RwSignal::new(ThresholdForm::default());
    let gate = StoredValue::new_local(RequestGate::new());

    let load = move |selected: String| {
        set_caliber.set(selected.clone());
        if selected.is_empty() {
            form.set(ThresholdForm::default());
            set_source.set("");
            return;
        }
        let Some(ticket) = gate.try_with_value(|g| g.issue()) else { return };
        spawn_local(async move {
            let result = api::client().get_thresholds(&selected).await;
            let Some(result) = gate.try_with_value(|g| g.accept(ticket, result)).flatten() else {
                return;
            };
            match result {
                Ok(t) => {
                    form.set(ThresholdForm::from_thresholds(t));
                    set_source.set("saved");
                }
                Err(Error::NotFound(_) | Error::Rejected(_)) => {
                    form.set(ThresholdForm::from_thresholds(default_thresholds(&selected)));
                    set_source.set("default");
                }
                Err(e) => ctx.error("Error loading thresholds", &e),
            }
        });
    };

    let save = move |_| {
        let selected = caliber.get_untracked();
        let thresholds = match form.with_untracked(|f| f.to_thresholds()) {
            Ok(t) => t,
            Err(e) => return ctx.error("", &e),
        };
        if !thresholds.is_ordered() {
            ctx.warning("Levels are usually ordered critical ≤ low ≤ target");
        }
        set_busy.set(true);
        spawn_local(async move {
            let result = api::client().save_thresholds(&selected, thresholds).await;
            set_busy.set(false);
            match result {
                Ok(message) => {
                    ctx.success(message);
                    set_source.set("saved");
                    ctx.reload_thresholds();
                }
                Err(e) => ctx.error("Error saving thresholds", &e),
            }
        });
    };

    let number_input = move |label: &'static str, get: fn(&ThresholdForm) -> String, set: fn(&mut ThresholdForm, String)| {
        view! {
            <div class="form-group">
                <label>{label}</label>
                <input
                    type="number"
                    min="0"
                    prop:value=move || form.with(get)
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                />
            </div>
        }
    };

    view! {
        <div class="threshold-panel">
            <h3>"Stock Thresholds"</h3>
            <div class="form-group">
                <label>"Caliber"</label>
                <select on:change=move |ev| load(event_target_value(&ev))>
                    <option value="">"Select caliber"</option>
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
                <small class="text-muted">
                    {move || match source.get() {
                        "default" => "No saved levels, showing defaults",
                        _ => "",
                    }}
                </small>
            </div>

            <div class="threshold-grid">
                {number_input("Critical", |f| f.critical.clone(), |f, v| f.critical = v)}
                {number_input("Low", |f| f.low.clone(), |f, v| f.low = v)}
                {number_input("Target", |f| f.target.clone(), |f, v| f.target = v)}
            </div>

            <button
                class="btn btn-primary"
                disabled=move || busy.get() || caliber.get().is_empty()
                on:click=save
            >
                "Save Thresholds"
            </button>
        </div>
    }
}
