pub mod app;
pub mod camera_controls;
pub mod history_panel;
pub mod lod_panel;
pub mod notice_toast;
pub mod settings_modal;
pub mod viewport_view;
