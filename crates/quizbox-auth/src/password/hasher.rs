//! PBKDF2-HMAC-SHA256 password hashing and verification.
//!
//! Encoded hashes use the `pbkdf2_sha256$<iterations>$<salt>$<base64 key>`
//! layout, so hashes written by earlier deployments keep verifying.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pbkdf2::pbkdf2_hmac;
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::Sha256;

use quizbox_core::config::auth::AuthConfig;

use crate::error::PasswordError;

/// Algorithm tag in the first field of an encoded hash.
const ALGORITHM: &str = "pbkdf2_sha256";
/// Salt length in characters.
const SALT_LEN: usize = 12;
/// Derived key length in bytes (SHA-256 output size).
const KEY_LEN: usize = 32;
/// Iteration count used when none is configured.
pub const DEFAULT_ITERATIONS: u32 = 24_000;

/// Hashes and verifies passwords with PBKDF2-HMAC-SHA256.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// Iterations applied to newly created hashes.
    iterations: u32,
}

impl PasswordHasher {
    /// Creates a hasher that uses `iterations` rounds for new hashes.
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    /// Creates a hasher from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.password_hash_iterations)
    }

    /// Hashes a plaintext password with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> String {
        let salt = generate_salt();
        let key = derive_key(password, &salt, self.iterations, KEY_LEN);
        format!(
            "{ALGORITHM}${}${salt}${}",
            self.iterations,
            STANDARD.encode(key)
        )
    }

    /// Verifies a plaintext password against an encoded hash.
    ///
    /// The iteration count and salt embedded in the hash are used, not the
    /// hasher's own settings.
    pub fn verify_password(&self, password: &str, encoded: &str) -> Result<(), PasswordError> {
        let parsed = ParsedHash::parse(encoded)?;
        let derived = derive_key(password, parsed.salt, parsed.iterations, parsed.key.len());

        if constant_time_eq(&derived, &parsed.key) {
            Ok(())
        } else {
            Err(PasswordError::Mismatch)
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

/// The four fields of an encoded hash.
struct ParsedHash<'a> {
    iterations: u32,
    salt: &'a str,
    key: Vec<u8>,
}

impl<'a> ParsedHash<'a> {
    fn parse(encoded: &'a str) -> Result<Self, PasswordError> {
        let parts: Vec<&str> = encoded.split('$').collect();
        let [algorithm, iterations, salt, key] = parts[..] else {
            return Err(PasswordError::MalformedHash("expected four '$'-separated fields"));
        };

        if algorithm != ALGORITHM {
            return Err(PasswordError::MalformedHash("unsupported algorithm"));
        }

        let iterations: u32 = iterations
            .parse()
            .map_err(|_| PasswordError::MalformedHash("iteration count is not a number"))?;
        if iterations == 0 {
            return Err(PasswordError::MalformedHash("iteration count is zero"));
        }

        if salt.is_empty() {
            return Err(PasswordError::MalformedHash("salt is empty"));
        }

        let key = STANDARD
            .decode(key)
            .map_err(|_| PasswordError::MalformedHash("key is not valid base64"))?;
        if key.is_empty() {
            return Err(PasswordError::MalformedHash("key is empty"));
        }

        Ok(Self {
            iterations,
            salt,
            key,
        })
    }
}

fn generate_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect()
}

fn derive_key(password: &str, salt: &str, iterations: u32, len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key);
    key
}

/// Compares two byte slices without short-circuiting on the first difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
