// Public API - what other modules can use
pub use generators::{IdentityGenerator, PetNameIdentityGenerator, UniqueIdentityGenerator};
pub use handlers::issue_token;
pub use issuer::TokenConfig;
pub use types::{AccessClaims, Grants, TokenQuery, TokenResponse, VideoGrant};

// Internal modules
mod generators;
mod handlers;
mod issuer;
mod types;
