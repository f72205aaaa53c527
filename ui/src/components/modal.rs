use super::class_editor::ClassEditorView;
use awsm_dashboard_engine::{ClassConfig, ModalHost};
use leptos::prelude::*;

/// Modal host of the dashboard page.
///
/// Only one editor is open at a time. `refresh` is bumped whenever the
/// editor hands control back so the class list picks up saved or deleted
/// classes.
#[derive(Clone, Copy)]
pub struct DashboardModals {
    pub open: RwSignal<Option<ClassConfig>>,
    pub refresh: RwSignal<u32>,
}

impl DashboardModals {
    pub fn new() -> Self {
        Self {
            open: RwSignal::new(None),
            refresh: RwSignal::new(0),
        }
    }

    pub fn show(&self, config: ClassConfig) {
        self.open.set(Some(config));
    }
}

impl ModalHost for DashboardModals {
    fn back_button(&self) {
        self.refresh.update(|n| *n += 1);
    }

    fn hide_all_modals(&self) {
        self.open.set(None);
        self.refresh.update(|n| *n += 1);
    }
}

#[component]
pub fn ClassModal(modals: DashboardModals) -> impl IntoView {
    move || {
        modals.open.get().map(|config| {
            let title = format!("{} / {}", config.api_type, config.class_name);
            view! {
                <div class="fixed inset-0 bg-black bg-opacity-40 flex items-center justify-center">
                    <div class="bg-white rounded-lg shadow-lg w-full max-w-xl p-6">
                        <div class="flex justify-between items-center mb-4">
                            <h3 class="text-lg font-bold">{title}</h3>
                            <button
                                class="text-gray-500 hover:text-gray-800"
                                on:click=move |_| modals.hide_all_modals()
                            >
                                "x"
                            </button>
                        </div>
                        <ClassEditorView config=config host=modals />
                    </div>
                </div>
            }
        })
    }
}
