use super::handlers;
use super::types::{AppState, Reply, Request};
use crate::ipc::error::err;

pub fn handle_request(state: &mut AppState, req: Request) -> Reply {
    if let Some(reply) = handlers::core::try_handle(state, &req) {
        return reply;
    }
    if let Some(reply) = handlers::auth::try_handle(state, &req) {
        return reply;
    }
    if let Some(reply) = handlers::records::try_handle(state, &req) {
        return reply;
    }

    Reply::Ready(err(
        &req.id,
        404,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    ))
}
