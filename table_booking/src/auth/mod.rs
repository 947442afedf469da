//! Shared-secret authorization for mutating endpoints.
//!
//! Callers present the configured key in a request header. The comparison runs
//! in constant time so response timing does not reveal how much of a guessed
//! key matched.
//!
//! ## Example
//!
//! ```
//! use table_booking::auth::ApiKey;
//!
//! let key = ApiKey::new("correct-horse-battery");
//! assert!(key.verify("correct-horse-battery"));
//! assert!(!key.verify("correct-horse"));
//! ```

use subtle::ConstantTimeEq;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "x-api-key";

/// Configured API key
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Constant-time comparison against a presented key
    pub fn verify(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}
