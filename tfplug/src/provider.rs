use crate::types::{Config, Diagnostics};
use async_trait::async_trait;

/// Provider-level entry points the plugin host drives.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Apply provider configuration. Called once per configuration cycle,
    /// before any resource operation.
    async fn configure(&mut self, config: Config) -> Diagnostics;

    /// Resource type names this provider validates.
    fn resource_types(&self) -> Vec<String>;

    /// Plan-time validation of one resource block.
    fn validate_resource_config(&self, resource_type: &str, config: &Config) -> Diagnostics;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dynamic;

    struct StaticProvider {
        configured: bool,
    }

    #[async_trait]
    impl Provider for StaticProvider {
        async fn configure(&mut self, config: Config) -> Diagnostics {
            let mut diags = Diagnostics::new();
            match config.get_string("endpoint") {
                Some(_) => self.configured = true,
                None => diags.add_error("endpoint is required", None::<String>),
            }
            diags
        }

        fn resource_types(&self) -> Vec<String> {
            vec!["static_thing".to_string()]
        }

        fn validate_resource_config(&self, resource_type: &str, _config: &Config) -> Diagnostics {
            let mut diags = Diagnostics::new();
            if resource_type != "static_thing" {
                diags.add_error(format!("Unknown resource: {}", resource_type), None::<String>);
            }
            diags
        }
    }

    #[tokio::test]
    async fn provider_trait_is_object_safe() {
        let mut provider: Box<dyn Provider> = Box::new(StaticProvider { configured: false });

        let diags = provider
            .configure(Config::new().with("endpoint", Dynamic::String("x".into())))
            .await;
        assert!(!diags.has_errors());

        assert_eq!(provider.resource_types(), vec!["static_thing".to_string()]);
        assert!(provider
            .validate_resource_config("other", &Config::new())
            .has_errors());
    }
}
