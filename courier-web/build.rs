//! Build script for courier-web: resolves the thread view configuration at
//! compile time and hands it to the client as `COURIER_*` variables.
//!
//! The file named by `COURIER_CONFIG` (or `courier.yaml` next to this
//! manifest) is loaded first; environment variables fill in whatever it
//! leaves at the defaults.

use std::env;
use std::path::PathBuf;

use shared::config::ThreadViewConfig;

const ENV_OVERRIDES: [&str; 3] = [
    "COURIER_GROUP_GAP_SECONDS",
    "COURIER_PAGE_SIZE",
    "COURIER_API_BASE_URL",
];

fn main() {
    println!("cargo:rerun-if-env-changed=COURIER_CONFIG");
    for var in ENV_OVERRIDES {
        println!("cargo:rerun-if-env-changed={var}");
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let config_path = env::var_os("COURIER_CONFIG")
        .map(PathBuf::from)
        .or_else(|| {
            let default = manifest_dir.join("courier.yaml");
            default.exists().then_some(default)
        });
    if let Some(path) = &config_path {
        println!("cargo:rerun-if-changed={}", path.display());
    }

    let config = ThreadViewConfig::load_config(config_path)
        .unwrap_or_else(|err| panic!("Invalid Courier configuration: {err}"));

    println!("cargo:rustc-env=COURIER_GROUP_GAP_SECONDS={}", config.group_gap_seconds);
    println!("cargo:rustc-env=COURIER_PAGE_SIZE={}", config.page_size);
    println!("cargo:rustc-env=COURIER_API_BASE_URL={}", config.api_base_url);
    println!("cargo:rustc-env=COURIER_STREAM_EVENT={}", config.stream_event);
}
