//! Admin credential checks.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use dialscope_core::service::Authenticator;
use rand_core::OsRng;
use tracing::warn;

use crate::{Error, Result};

/// Exact comparison against a configured plaintext secret.
pub struct PlaintextAuthenticator {
  secret: String,
}

impl PlaintextAuthenticator {
  pub fn new(secret: impl Into<String>) -> Self { Self { secret: secret.into() } }
}

impl Authenticator for PlaintextAuthenticator {
  fn verify(&self, secret: &str) -> bool { secret == self.secret }
}

/// Verification against an argon2 PHC string, e.g. `$argon2id$v=19$…`
pub struct Argon2Authenticator {
  password_hash: String,
}

impl Argon2Authenticator {
  pub fn new(password_hash: impl Into<String>) -> Self {
    Self { password_hash: password_hash.into() }
  }
}

impl Authenticator for Argon2Authenticator {
  fn verify(&self, secret: &str) -> bool {
    let parsed = match PasswordHash::new(&self.password_hash) {
      Ok(parsed) => parsed,
      Err(e) => {
        warn!(error = %e, "configured admin password hash is malformed");
        return false;
      }
    };
    Argon2::default()
      .verify_password(secret.as_bytes(), &parsed)
      .is_ok()
  }
}

/// Used when no admin credential is configured.
pub struct DenyAll;

impl Authenticator for DenyAll {
  fn verify(&self, _secret: &str) -> bool { false }
}

/// Produce the argon2 PHC string for `password`.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| Error::Hash(e.to_string()))?
      .to_string(),
  )
}
