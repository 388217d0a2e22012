//! Item Board Frontend Entry Point

mod actions;
mod api;
mod app;
mod cache;
mod components;
mod config;
mod context;
mod error;
mod logging;
mod models;
mod store;

use app::App;
use leptos::prelude::*;
use log::LevelFilter;

fn main() {
    console_error_panic_hook::set_once();
    logging::init(LevelFilter::Debug);
    mount_to_body(App);
}
