//! Two-level dataset selector: one option group per category.

use crate::state::AppState;
use dioxus::prelude::*;

/// Dataset dropdown grouped by category.
/// Reads the grouped catalog from AppState and updates selected_dataset on change.
#[component]
pub fn DatasetSelector() -> Element {
    let mut state = use_context::<AppState>();
    let groups = state.groups.read().clone();
    let selected = (state.selected_dataset)();

    let on_change = move |evt: Event<FormData>| {
        state.selected_dataset.set(evt.value());
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "dataset-select",
                style: "font-weight: bold; margin-right: 8px;",
                "Indicador: "
            }
            select {
                id: "dataset-select",
                onchange: on_change,
                for group in groups.iter() {
                    optgroup {
                        key: "{group.category}",
                        label: "{group.category}",
                        for dataset in group.datasets.iter() {
                            option {
                                key: "{dataset.id}",
                                value: "{dataset.id}",
                                selected: dataset.id == selected,
                                "{dataset.metric}"
                            }
                        }
                    }
                }
            }
        }
    }
}
