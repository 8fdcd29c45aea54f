use std::sync::Arc;

use score_domain::ResourceDeclaration;

use crate::error::ProviderError;
use crate::provider::Provider;

/// A priority-ordered sequence of providers (spec §4.3).
///
/// `find_first_matching` returns the first provider whose `matches` succeeds;
/// the caller is responsible for registration order (higher priority first).
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self { providers: Vec::new() }
    }

    /// Register a provider at the end of the priority list. Returns `&mut
    /// self` for chaining.
    pub fn register(&mut self, provider: Arc<dyn Provider>) -> &mut Self {
        self.providers.push(provider);
        self
    }

    pub fn find_first_matching(
        &self,
        declaration: &ResourceDeclaration,
    ) -> Result<Arc<dyn Provider>, ProviderError> {
        self.providers
            .iter()
            .find(|p| p.matches(declaration))
            .cloned()
            .ok_or_else(|| ProviderError::NoMatch {
                res_type: declaration.res_type.clone(),
                class: declaration.class.clone(),
                id: declaration.id.clone().unwrap_or_default(),
            })
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
