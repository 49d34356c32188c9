use serde_json::json;

use crate::auth::CredentialService;
use crate::ipc::outbox::Outbox;
use crate::ipc::error::{ok, ok_status, service_err};
use crate::ipc::types::{AppState, Reply, Request};

fn str_param(req: &Request, key: &str) -> String {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Hashing is slow on purpose, so both credential calls leave the main loop
/// and answer from the worker pool.
fn dispatch_to_worker<F>(state: &mut AppState, req: &Request, job: F) -> Reply
where
    F: FnOnce(&CredentialService<crate::db::Db>, &str, &str) -> serde_json::Value
        + Send
        + 'static,
{
    let db = match state.db() {
        Ok(db) => db.clone(),
        Err(e) => return Reply::Ready(service_err(&req.id, &e)),
    };
    let service = CredentialService::new(db, state.hasher.clone());
    let username = str_param(req, "username");
    let password = str_param(req, "password");

    state.submit_job(move |outbox: &Outbox| {
        let resp = job(&service, &username, &password);
        outbox.send(&resp);
    });
    Reply::Deferred
}

fn handle_register(state: &mut AppState, req: &Request) -> Reply {
    let id = req.id.clone();
    dispatch_to_worker(state, req, move |service, username, password| {
        match service.register(username, password) {
            Ok(_) => ok_status(
                &id,
                201,
                json!({ "message": "User registered successfully" }),
            ),
            Err(e) => service_err(&id, &e),
        }
    })
}

fn handle_login(state: &mut AppState, req: &Request) -> Reply {
    let id = req.id.clone();
    dispatch_to_worker(state, req, move |service, username, password| {
        match service.authenticate(username, password) {
            Ok(user) => ok(&id, json!({ "message": "Login successful", "user": user })),
            Err(e) => service_err(&id, &e),
        }
    })
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Reply> {
    match req.method.as_str() {
        "auth.register" => Some(handle_register(state, req)),
        "auth.login" => Some(handle_login(state, req)),
        _ => None,
    }
}
