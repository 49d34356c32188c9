//! Local username/password accounts: hashing, the user store seam and the
//! register/login service built on both.

mod password;
mod service;
mod store;

pub use password::SecretHasher;
pub use service::CredentialService;
pub use store::{UserCredential, UserIdentity, UserStore};
