pub mod common;
pub mod debug;
pub mod help_overlay;
pub mod home;
pub mod likes;
pub mod name_editor;
pub mod spinner;
pub mod status_bar;
