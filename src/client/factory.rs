//! One cached [`RestService`] per model.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::http::ApiClient;
use super::service::RestService;
use super::session::lock;
use crate::models::ModelDescriptor;

#[derive(Debug)]
pub struct ServiceFactory {
    client: Arc<ApiClient>,
    services: Mutex<HashMap<String, Arc<RestService>>>,
}

impl ServiceFactory {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            services: Mutex::new(HashMap::new()),
        }
    }

    /// The model's service, created on first use.
    pub fn service(&self, model: &ModelDescriptor) -> Arc<RestService> {
        let mut services = lock(&self.services);
        Arc::clone(
            services
                .entry(model.model_name().to_string())
                .or_insert_with(|| {
                    tracing::debug!("Creating service for {}", model.model_name());
                    Arc::new(RestService::new(Arc::clone(&self.client), model.endpoint()))
                }),
        )
    }

    /// An uncached service for an arbitrary endpoint.
    pub fn custom_service(&self, endpoint: impl Into<String>) -> RestService {
        RestService::new(Arc::clone(&self.client), endpoint)
    }

    pub fn clear_cache(&self) {
        lock(&self.services).clear();
    }

    /// Snapshot of the cached services by model name.
    pub fn services(&self) -> HashMap<String, Arc<RestService>> {
        lock(&self.services).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{arco, obra};
    use crate::client::{CrudService, MemorySessionStore};
    use crate::config::Config;

    fn factory() -> ServiceFactory {
        let client = ApiClient::new(&Config::default(), Arc::new(MemorySessionStore::new())).unwrap();
        ServiceFactory::new(Arc::new(client))
    }

    #[test]
    fn test_service_is_cached_per_model() {
        let factory = factory();
        let obra = obra().unwrap();

        let first = factory.service(&obra);
        let second = factory.service(&obra);
        assert!(Arc::ptr_eq(&first, &second));

        factory.service(&arco().unwrap());
        let services = factory.services();
        assert_eq!(services.len(), 2);
        assert!(services.contains_key("Arco"));
    }

    #[test]
    fn test_clear_cache_and_custom_service() {
        let factory = factory();
        let obra = obra().unwrap();
        let first = factory.service(&obra);

        factory.clear_cache();
        assert!(factory.services().is_empty());
        assert!(!Arc::ptr_eq(&first, &factory.service(&obra)));

        let custom = factory.custom_service("/reportes");
        assert_eq!(custom.endpoint(), "/reportes");
        assert_eq!(factory.services().len(), 1);
    }
}
