// src/lib.rs
pub mod api;
pub mod banner;
pub mod config;
pub mod dom;
pub mod errors;
pub mod models;
pub mod navigation;
pub mod ordering;
pub mod poller;
pub mod render;
pub mod source;
pub mod view;
