use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Redraws attempted before falling back to a random suffix
const MAX_REDRAWS: usize = 8;

/// Trait for generating the display identity handed out with a token
#[async_trait]
pub trait IdentityGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Pet name-based identity generator
pub struct PetNameIdentityGenerator;

impl PetNameIdentityGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PetNameIdentityGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityGenerator for PetNameIdentityGenerator {
    async fn generate(&self) -> String {
        petname::Petnames::default().generate_one(2, "-")
    }
}

/// Hands out each identity at most once for the lifetime of the process.
///
/// The video service refuses a second participant with an identity already
/// present in the room, so two tabs must never be issued the same name.
pub struct UniqueIdentityGenerator<G> {
    inner: G,
    issued: RwLock<HashSet<String>>,
}

impl<G: IdentityGenerator> UniqueIdentityGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            issued: RwLock::new(HashSet::new()),
        }
    }

    pub async fn issued_count(&self) -> usize {
        self.issued.read().await.len()
    }
}

#[async_trait]
impl<G: IdentityGenerator> IdentityGenerator for UniqueIdentityGenerator<G> {
    async fn generate(&self) -> String {
        let mut issued = self.issued.write().await;

        for _ in 0..MAX_REDRAWS {
            let candidate = self.inner.generate().await;
            if issued.insert(candidate.clone()) {
                return candidate;
            }
            debug!(identity = %candidate, "Identity already issued, redrawing");
        }

        // Suffixed names can still collide in theory; keep drawing until one is new
        let base = self.inner.generate().await;
        loop {
            let suffix = Uuid::new_v4().simple().to_string();
            let candidate = format!("{}-{}", base, &suffix[..8]);
            if issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
