mod app;
mod assets;
mod config;
mod hotkey;
mod pet;
mod platform;
mod render;
mod timer;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Desktop cat starting up");

    if let Err(e) = app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
