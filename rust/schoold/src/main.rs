mod auth;
mod db;
mod error;
mod ipc;
mod palette;
mod records;
mod settings;

use log::{error, info, warn};
use std::io::{self, BufRead};

use auth::SecretHasher;
use palette::Palette;
use settings::Settings;

fn main() {
    // stdout carries the protocol; env_logger writes to stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("schoold exiting: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let palette = Palette::new(settings.palette.clone())?;
    let hasher = SecretHasher::from_costs(
        settings.hashing.memory_kib,
        settings.hashing.iterations,
        settings.hashing.parallelism,
    )?;
    if settings.hashing.workers == 0 {
        anyhow::bail!("hashing.workers must be at least 1");
    }
    info!(
        "schoold {} starting (palette of {} colors, {} credential workers)",
        env!("CARGO_PKG_VERSION"),
        palette.len(),
        settings.hashing.workers
    );

    let mut state = ipc::AppState::new(
        palette,
        hasher,
        ipc::Outbox::stdout(),
        settings.hashing.workers,
    );
    if let Some(path) = settings.workspace.clone() {
        ipc::open_workspace(&mut state, path)?;
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                warn!("stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to reply to.
                state
                    .outbox
                    .send(&ipc::err("", 400, "bad_json", e.to_string(), None));
                continue;
            }
        };

        if let ipc::Reply::Ready(resp) = ipc::handle_request(&mut state, req) {
            state.outbox.send(&resp);
        }
    }

    state.join_workers();
    info!("stdin closed, shutting down");
    Ok(())
}
