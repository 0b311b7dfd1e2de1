pub mod password;
pub mod token;

/// Authentication failures. `InvalidCredentials` and `InvalidToken` map to
/// 401 at the API boundary; `Crypto` is an internal fault.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("crypto failure: {0}")]
    Crypto(String),
}
