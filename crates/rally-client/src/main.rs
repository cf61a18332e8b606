//! Rally-Viewer Client
//!
//! Yew WASM frontend: analysis lookup, video playback and the rally
//! timeline editor.
//!
//! Build with `trunk build` or `cargo check -p rally-client --target wasm32-unknown-unknown`.

mod api;
mod app;
mod components;
mod hooks;
mod pages;
mod routes;
mod storage;
mod video;

use app::App;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;

fn main() {
    // Panics are saved and shown on the panic page
    pages::set_panic_hook();

    let filter = EnvFilter::new("info,rally_core=debug,rally_client=debug");

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();

    yew::Renderer::<App>::new().render();
}
