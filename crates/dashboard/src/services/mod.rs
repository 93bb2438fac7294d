pub mod command_service;
pub mod render_service;
