use super::modal::DashboardModals;
use crate::api::{self, GlooResourceClient};
use awsm_dashboard_engine::{ClassConfig, ClassType};
use leptos::prelude::*;

#[component]
pub fn ClassPicker(modals: DashboardModals) -> impl IntoView {
    let selected = RwSignal::new(ClassType::Image);
    let (new_name, set_new_name) = signal(String::new());
    let client = use_context::<GlooResourceClient>().unwrap_or_default();

    let classes = LocalResource::new(move || {
        let api_type = selected.get().api_type();
        // reload after every save or delete
        modals.refresh.track();
        let client = client.clone();
        async move { api::list_classes(&client, api_type).await }
    });

    let create = move |_: leptos::ev::MouseEvent| {
        let name = new_name.get().trim().to_string();
        if name.is_empty() {
            return;
        }
        set_new_name.set(String::new());
        modals.show(ClassConfig::new(selected.get().api_type(), name));
    };

    view! {
        <div class="p-6">
            <div class="flex space-x-2 mb-6">
                {ClassType::ALL
                    .into_iter()
                    .map(|class_type| {
                        view! {
                            <button
                                class=move || {
                                    if selected.get() == class_type {
                                        "px-4 py-2 rounded bg-gray-800 text-white"
                                    } else {
                                        "px-4 py-2 rounded bg-gray-200 hover:bg-gray-300"
                                    }
                                }
                                on:click=move |_| selected.set(class_type)
                            >
                                {class_type.display_name()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="flex space-x-2 mb-6">
                <input
                    type="text"
                    class="px-3 py-2 text-sm border border-gray-300 rounded-md"
                    placeholder="New class name"
                    prop:value=new_name
                    on:input=move |ev| set_new_name.set(event_target_value(&ev))
                />
                <button class="bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded" on:click=create>
                    "+ New Class"
                </button>
            </div>

            <Suspense fallback=move || view! { <div class="text-gray-500">"Loading..."</div> }>
                {move || {
                    classes.get().map(|result| match result {
                        Ok(catalog) if !catalog.is_empty() => {
                            let api_type = selected.get_untracked().api_type();
                            catalog
                                .names()
                                .map(|name| {
                                    let mut config = ClassConfig::new(api_type, name).with_delete(true);
                                    if let Some(bytes) = catalog.class_bytes(name) {
                                        config = config.with_existing(bytes);
                                    }
                                    view! {
                                        <div
                                            class="p-3 bg-white rounded shadow mb-2 cursor-pointer hover:bg-gray-50"
                                            on:click=move |_| modals.show(config.clone())
                                        >
                                            {name.to_string()}
                                        </div>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }
                        Ok(_) => view! {
                            <div class="text-gray-500">"No classes configured"</div>
                        }
                        .into_any(),
                        Err(e) => view! { <div class="text-red-500">{e}</div> }.into_any(),
                    })
                }}
            </Suspense>
        </div>
    }
}
