use crate::config::ProviderProfile;
use crate::domain::TaskKind;
use crate::infrastructure::model::{ProviderClient, ProviderFactory};
use std::sync::Arc;
use tracing::{info, warn};

/// A configured provider and, when its credential resolved, a ready client.
#[derive(Clone)]
pub struct RegisteredProvider {
    pub profile: ProviderProfile,
    pub client: Option<Arc<dyn ProviderClient>>,
}

impl RegisteredProvider {
    pub fn available(profile: ProviderProfile, client: Arc<dyn ProviderClient>) -> Self {
        Self {
            profile,
            client: Some(client),
        }
    }

    pub fn unavailable(profile: ProviderProfile) -> Self {
        Self {
            profile,
            client: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }
}

impl std::fmt::Debug for RegisteredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredProvider")
            .field("id", &self.profile.id)
            .field("available", &self.is_available())
            .finish()
    }
}

/// Read-only set of providers, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<RegisteredProvider>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<RegisteredProvider>) -> Self {
        Self { providers }
    }

    /// Build clients for every profile. Providers whose credential is not
    /// set stay registered but are never selected.
    pub fn from_profiles(profiles: &[ProviderProfile]) -> Self {
        let providers = profiles
            .iter()
            .map(|profile| match ProviderFactory::create(profile) {
                Some(client) => {
                    info!(
                        provider = profile.id.as_str(),
                        kind = profile.kind.as_str(),
                        model = profile.model.as_str(),
                        "Provider ready"
                    );
                    RegisteredProvider::available(profile.clone(), client)
                }
                None => {
                    warn!(
                        provider = profile.id.as_str(),
                        env_var = profile.api_key.as_deref().unwrap_or("<none>"),
                        "Provider unavailable: credential not configured"
                    );
                    RegisteredProvider::unavailable(profile.clone())
                }
            })
            .collect();
        Self { providers }
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredProvider> {
        self.providers.iter().find(|provider| provider.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredProvider> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Known, available and declaring support for `task`.
    pub fn can_serve(&self, id: &str, task: TaskKind) -> bool {
        self.get(id)
            .is_some_and(|provider| provider.is_available() && provider.profile.supports(task))
    }
}
