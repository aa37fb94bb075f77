// src/api/handlers/mod.rs
mod assets;
mod health;
mod results;

pub use assets::static_file_handler;
pub use health::health_check;
pub use results::{results_fragment, results_page, results_status};
