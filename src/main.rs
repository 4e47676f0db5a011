//! Teamboard Frontend Entry Point

mod activity;
mod api;
mod app;
mod components;
mod mentions;
mod models;
mod notifications;
mod realtime;
mod reorder;
mod session;
mod store;
mod timing;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    mount_to_body(App);
}
