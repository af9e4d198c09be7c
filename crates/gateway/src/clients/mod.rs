//! Clients for external services.

mod firebase_client;

pub use firebase_client::{FirebaseAuthClient, IdentityProvider, TokenResponse, VerifiedIdentity};
