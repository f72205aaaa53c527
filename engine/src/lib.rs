//! Platform neutral core of the asset class editors
//!
//! The engine owns everything an editor does except drawing and HTTP:
//! draft decoding, the lifecycle state machine, and the schema driven form
//! description. Hosts plug in a [`ResourceClient`] and a [`ModalHost`] and
//! run the [`Job`]s the controller hands back.

pub mod client;
pub mod controller;
pub mod draft;
pub mod error;
pub mod payload;
pub mod render;
pub mod store;
pub mod template;
pub mod token;

pub use client::{Endpoint, ModalHost, ResourceClient};
pub use controller::{ClassConfig, ClassEditor, Job, DELETED_MESSAGE, SAVED_MESSAGE};
pub use draft::{Draft, DraftValue};
pub use error::{DecodeError, EditorError, TransportError};
pub use payload::{ClassCatalog, DependentResource, DependentResourceList, OptionsSchema};
pub use render::{Choice, FieldRender, FormAction, FormView};
pub use store::{Activity, EditorState, FetchKind, Phase, Step, UiStatus};
pub use template::{ClassTemplate, ClassType, FieldDescriptor, WidgetKind};
pub use token::MountToken;
