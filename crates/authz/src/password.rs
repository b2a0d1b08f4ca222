use crate::AuthError;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// Hashes and verifies seller passwords with bcrypt.
///
/// bcrypt is deliberately slow, so both operations run on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn from_settings(settings: &bookstall_kernel::settings::AuthSettings) -> Self {
        Self::new(settings.bcrypt_cost)
    }

    pub async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hashed)
    }

    /// Returns `Ok(false)` for a wrong password; errors only on malformed hashes.
    pub async fn verify(&self, password: &str, hashed: &str) -> Result<bool, AuthError> {
        let password = password.to_owned();
        let hashed = hashed.to_owned();
        let matches =
            tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed)).await??;
        Ok(matches)
    }
}
