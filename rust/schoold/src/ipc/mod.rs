mod error;
mod handlers;
mod outbox;
mod router;
mod types;
mod workers;

pub use error::err;
pub use handlers::core::open_workspace;
pub use outbox::Outbox;
pub use router::handle_request;
pub use types::{AppState, Reply, Request};
