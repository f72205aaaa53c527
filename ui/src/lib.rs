use leptos::prelude::*;

mod api;
mod components;

use components::class_picker::ClassPicker;
use components::modal::{ClassModal, DashboardModals};

#[component]
pub fn App() -> impl IntoView {
    provide_context(api::GlooResourceClient::new(api::API_BASE, api::TIMEOUT_SECS));
    let modals = DashboardModals::new();

    view! {
        <div class="min-h-screen bg-gray-100">
            <div class="bg-gray-800 text-white p-4">
                <h1 class="text-2xl font-bold">"Asset Classes"</h1>
            </div>
            <ClassPicker modals=modals />
            <ClassModal modals=modals />
        </div>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    // engine tracing events are forwarded through the log facade
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(App);
}
