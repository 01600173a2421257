pub mod handlers;
pub mod main_menu;

pub use main_menu::{run_main_loop, show_main_menu};
