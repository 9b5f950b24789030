mod app;
mod config;
mod engine;
mod library;
mod logging;
mod mpris;
mod runtime;
mod session;
mod transport;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
