pub mod class_editor;
pub mod class_picker;
pub mod fields;
pub mod modal;
