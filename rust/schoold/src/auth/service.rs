use log::{info, warn};

use super::password::SecretHasher;
use super::store::{UserCredential, UserIdentity, UserStore};
use crate::error::ServiceError;

pub struct CredentialService<S> {
    store: S,
    hasher: SecretHasher,
}

impl<S: UserStore> CredentialService<S> {
    pub fn new(store: S, hasher: SecretHasher) -> Self {
        Self { store, hasher }
    }

    /// Creates an account. The existence check runs before hashing so a
    /// duplicate costs no hash; the store's unique constraint still decides
    /// when two registrations race.
    pub fn register(&self, username: &str, secret: &str) -> Result<UserCredential, ServiceError> {
        let username = require_fields(username, secret)?;

        if self.store.find_by_username(username)?.is_some() {
            warn!("registration rejected: username already taken");
            return Err(ServiceError::Conflict("Username already exists".into()));
        }

        let secret_hash = self.hasher.hash(secret)?;
        let cred = self.store.insert_user(username, &secret_hash)?;
        info!("registered user id={}", cred.id);
        Ok(cred)
    }

    pub fn authenticate(&self, username: &str, secret: &str) -> Result<UserIdentity, ServiceError> {
        let username = require_fields(username, secret)?;

        let Some(cred) = self.store.find_by_username(username)? else {
            // Same hashing cost as a wrong password.
            self.hasher.verify_dummy(secret);
            warn!("login failed");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.hasher.verify(secret, &cred.secret_hash)? {
            warn!("login failed");
            return Err(ServiceError::InvalidCredentials);
        }

        info!("user id={} logged in", cred.id);
        Ok(cred.identity())
    }
}

fn require_fields<'a>(username: &'a str, secret: &str) -> Result<&'a str, ServiceError> {
    let username = username.trim();
    if username.is_empty() || secret.is_empty() {
        return Err(ServiceError::Validation(
            "Username and password are required".into(),
        ));
    }
    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use std::sync::Arc;
    use std::time::Instant;

    fn service() -> CredentialService<Db> {
        let db = Db::open_in_memory().expect("db");
        CredentialService::new(db, SecretHasher::from_costs(1024, 1, 1).expect("params"))
    }

    #[test]
    fn register_then_authenticate() {
        let svc = service();
        let cred = svc.register("alice", "pw1").expect("register");
        let who = svc.authenticate("alice", "pw1").expect("login");
        assert_eq!(who.username, "alice");
        assert_eq!(who.id, cred.id);
    }

    #[test]
    fn username_is_trimmed() {
        let svc = service();
        svc.register("  alice ", "pw1").expect("register");
        assert_eq!(svc.authenticate("alice", "pw1").unwrap().username, "alice");
        assert!(matches!(
            svc.register("alice", "other"),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn wrong_secret_and_unknown_user_fail_identically() {
        let svc = service();
        svc.register("alice", "pw1").expect("register");

        let wrong = svc.authenticate("alice", "wrong").unwrap_err();
        let unknown = svc.authenticate("mallory", "pw1").unwrap_err();
        assert!(matches!(wrong, ServiceError::InvalidCredentials));
        assert!(matches!(unknown, ServiceError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert_eq!(wrong.status(), unknown.status());
        assert_eq!(wrong.code(), unknown.code());
    }

    #[test]
    fn unknown_user_pays_the_hashing_cost() {
        let db = Db::open_in_memory().expect("db");
        let svc = CredentialService::new(db, SecretHasher::from_costs(8192, 2, 1).expect("params"));
        svc.register("alice", "pw1").expect("register");

        let time = |user: &str| {
            let start = Instant::now();
            for _ in 0..5 {
                assert!(matches!(
                    svc.authenticate(user, "wrong"),
                    Err(ServiceError::InvalidCredentials)
                ));
            }
            start.elapsed()
        };
        let wrong_password = time("alice");
        let unknown_user = time("nobody");
        assert!(
            unknown_user * 4 > wrong_password,
            "unknown_user={:?} wrong_password={:?}",
            unknown_user,
            wrong_password
        );
    }

    #[test]
    fn second_registration_conflicts_in_either_order() {
        for (first, second) in [("pw1", "pw2"), ("pw2", "pw1")] {
            let svc = service();
            assert!(svc.register("alice", first).is_ok());
            let e = svc.register("alice", second).unwrap_err();
            assert!(matches!(e, ServiceError::Conflict(_)));
            assert_eq!(e.status(), 409);
            assert!(svc.authenticate("alice", first).is_ok());
        }
    }

    #[test]
    fn empty_inputs_are_validation_errors() {
        let svc = service();
        for (u, p) in [("", "pw"), ("alice", ""), ("   ", "pw"), ("", "")] {
            assert!(matches!(
                svc.register(u, p),
                Err(ServiceError::Validation(_))
            ));
            assert!(matches!(
                svc.authenticate(u, p),
                Err(ServiceError::Validation(_))
            ));
        }
    }

    #[test]
    fn stored_hash_is_salted_and_never_plaintext() {
        let svc = service();
        let a = svc.register("alice", "same-secret").unwrap();
        let b = svc.register("bob", "same-secret").unwrap();
        assert_ne!(a.secret_hash, "same-secret");
        assert_ne!(b.secret_hash, "same-secret");
        assert_ne!(a.secret_hash, b.secret_hash);
    }

    #[test]
    fn concurrent_duplicate_registrations_yield_one_account() {
        let svc = Arc::new(service());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let svc = Arc::clone(&svc);
                std::thread::spawn(move || svc.register("racer", &format!("pw{}", i)))
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect();
        let ok = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(ServiceError::Conflict(_))))
            .count();
        assert_eq!(ok, 1);
        assert_eq!(conflicts, 7);
    }
}
