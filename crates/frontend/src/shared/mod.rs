pub mod api_utils;
pub mod components;
pub mod date_utils;
pub mod export;
pub mod form_controller;
pub mod gate;
pub mod icons;
pub mod list_controller;
pub mod list_utils;
pub mod modal;
pub mod notifications;
pub mod resource;
