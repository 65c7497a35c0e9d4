// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};

/// Output of [`hash_password`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    /// PHC string, embeds the cost parameters
    pub hash: String,
    pub salt: String,
}

/// scrypt cost, expressed as log2(N). r=8, p=1 are fixed.
#[derive(Debug, Clone, Copy)]
pub struct HashCost {
    pub log_n: u8,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            log_n: Params::RECOMMENDED_LOG_N,
        }
    }
}

impl HashCost {
    fn params(self) -> anyhow::Result<Params> {
        Params::new(
            self.log_n,
            Params::RECOMMENDED_R,
            Params::RECOMMENDED_P,
            Params::RECOMMENDED_LEN,
        )
        .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))
    }
}

/// Hash a password using scrypt with a fresh random salt
pub fn hash_password(plain: &str, cost: HashCost) -> anyhow::Result<PasswordDigest> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, cost.params()?, &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
        .to_string();

    Ok(PasswordDigest {
        hash,
        salt: salt.as_str().to_string(),
    })
}

/// Verify a password against a stored hash and salt.
///
/// The derived key comparison is constant-time.
pub fn verify_password(plain: &str, hash: &str, salt: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    if parsed_hash.salt.map(|s| s.as_str()) != Some(salt) {
        return false;
    }

    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}
