//! In-memory [`IdentityProvider`] implementation.
//!
//! A token table standing in for the real credential service (JWT
//! verification lives outside the session engine). Unknown tokens fail with
//! `Unauthenticated`; the join use case turns that into an anonymous
//! fallback rather than rejecting the connection.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Identity, IdentityError, IdentityProvider};

pub struct InMemoryIdentityProvider {
    tokens: Mutex<HashMap<String, Identity>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Register a token -> identity mapping.
    pub async fn insert_token(&self, token: &str, identity: Identity) {
        let mut tokens = self.tokens.lock().await;
        tokens.insert(token.to_string(), identity);
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn verify(&self, credential_token: &str) -> Result<Identity, IdentityError> {
        let tokens = self.tokens.lock().await;
        tokens
            .get(credential_token)
            .cloned()
            .ok_or(IdentityError::Unauthenticated)
    }
}
