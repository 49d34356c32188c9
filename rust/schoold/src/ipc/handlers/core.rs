use log::info;
use serde_json::json;
use std::path::PathBuf;

use crate::db::Db;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Reply, Request};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "paletteSize": state.palette.len(),
            "palette": state.palette.colors(),
            "hashing": {
                "memoryKib": state.hasher.memory_kib(),
                "iterations": state.hasher.iterations(),
                "parallelism": state.hasher.parallelism(),
                "workers": state.worker_count(),
            },
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, 400, "bad_params", "missing params.path", None);
    };

    match open_workspace(state, path.clone()) {
        Ok(()) => ok(&req.id, json!({ "workspacePath": path.to_string_lossy() })),
        Err(e) => {
            log::error!("failed to open workspace {}: {:?}", path.display(), e);
            err(&req.id, 500, "db_open_failed", "could not open workspace", None)
        }
    }
}

/// Opens (creating if needed) the workspace database and makes it current.
pub fn open_workspace(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    let db = Db::open(&path)?;
    info!("workspace opened: {}", path.display());
    state.workspace = Some(path);
    state.db = Some(db);
    Ok(())
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Reply> {
    match req.method.as_str() {
        "health" => Some(Reply::Ready(handle_health(state, req))),
        "workspace.select" => Some(Reply::Ready(handle_workspace_select(state, req))),
        _ => None,
    }
}
