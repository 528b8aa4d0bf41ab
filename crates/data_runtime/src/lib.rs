//! data_runtime: data schemas and loaders for the combat core.
//!
//! Every loader has a `load_default()` that reads `data/config/*.toml` when
//! present and otherwise falls back to coded defaults, so the simulation
//! (and its tests) never require data files on disk.

pub mod boss;
pub mod player;
pub mod spawn;
pub mod species;
pub mod status;
pub mod zone;
pub mod specs {
    pub mod projectiles;
}
pub mod configs {
    pub mod telemetry;
}

pub(crate) fn data_root() -> std::path::PathBuf {
    let here = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() {
        ws
    } else {
        here.join("data")
    }
}
