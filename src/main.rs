/// Bundled service endpoints for builds shipped without a `.env` (web/mobile)
const BUNDLED_ENV: &str = include_str!("../assets/config.env");

#[cfg(not(target_arch = "wasm32"))]
fn load_env() {
    // Desktop dev: a local .env wins when present
    if dotenvy::dotenv().is_ok() {
        return;
    }

    load_bundled_env();
}

#[cfg(target_arch = "wasm32")]
fn load_env() {
    load_bundled_env();
}

/// Seed the `INFRAZEN_*` variables consumed by `DashboardConfig` from the
/// bundled file. Values already present in the environment win.
fn load_bundled_env() {
    for line in BUNDLED_ENV.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();
            if std::env::var(key).is_err() {
                // SAFETY: set at startup before any threads are spawned
                unsafe {
                    std::env::set_var(key, value);
                }
            }
        }
    }
}

fn main() {
    load_env();
    tracing_subscriber::fmt::init();
    dioxus::launch(infrazen::ui::App);
}
