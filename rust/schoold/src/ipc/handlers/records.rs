use serde_json::json;

use crate::ipc::error::{err, ok, ok_status, service_err};
use crate::ipc::types::{AppState, Reply, Request};
use crate::records::{self, RecordKind};

fn handle_create(state: &mut AppState, req: &Request, kind: RecordKind) -> serde_json::Value {
    let db = match state.db() {
        Ok(db) => db,
        Err(e) => return service_err(&req.id, &e),
    };
    let Some(name) = req.params.get("name").and_then(|v| v.as_str()) else {
        return err(&req.id, 400, "bad_params", "missing name", None);
    };

    match records::create_record(db, kind, &state.palette, name) {
        Ok(record) => {
            log::info!(
                "created {} {} with color {}",
                kind.key(),
                record.id,
                record.bg_color
            );
            ok_status(&req.id, 201, json!({ (kind.key()): record }))
        }
        Err(e) => service_err(&req.id, &e),
    }
}

fn handle_list(state: &mut AppState, req: &Request, kind: RecordKind) -> serde_json::Value {
    let Some(db) = state.db.as_ref() else {
        return ok(&req.id, json!({ (kind.namespace()): [] }));
    };
    match records::list_records(db, kind) {
        Ok(rows) => ok(&req.id, json!({ (kind.namespace()): rows })),
        Err(e) => service_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Reply> {
    let (ns, action) = req.method.split_once('.')?;
    let kind = RecordKind::from_namespace(ns)?;
    match action {
        "create" => Some(Reply::Ready(handle_create(state, req, kind))),
        "list" => Some(Reply::Ready(handle_list(state, req, kind))),
        _ => None,
    }
}
