use gateway_service::config::{GatewayConfig, GoogleConfig, ModelConfig, StorageConfig};
use gateway_service::services::providers::mock::MockTextProvider;
use gateway_service::startup::Application;
use std::sync::Arc;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub upload_path: String,
    pub provider: Arc<MockTextProvider>,
}

impl TestApp {
    /// Spawn the gateway on a random port with the given scripted provider.
    pub async fn spawn(provider: MockTextProvider) -> Self {
        let upload_path = format!("target/test-uploads-{}", Uuid::new_v4());
        let config = GatewayConfig {
            common: service_core::config::Config {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            google: GoogleConfig {
                api_key: "test-api-key".to_string(),
            },
            model: ModelConfig {
                name: "gemini-2.0-flash".to_string(),
                temperature: 0.5,
            },
            storage: StorageConfig {
                upload_path: upload_path.clone(),
            },
        };

        let provider = Arc::new(provider);
        let app = Application::build_with_provider(config, provider.clone())
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            upload_path,
            provider,
        }
    }

    /// True when no spooled upload is left behind.
    pub fn upload_dir_is_empty(&self) -> bool {
        match std::fs::read_dir(&self.upload_path) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => true,
        }
    }

    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.upload_path).await;
    }
}
