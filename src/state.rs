use reqwest::Client as ReqwestClient;
use shared::{CompanyConfig, Config};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domains::edi::InvoiceWorkflow;
use crate::domains::resolutions::{InMemoryResolutionStore, ResolutionStore, ResolutionSync};

/// Estado compartido de la aplicación.
/// Configuración de la compañía, cliente HTTP y el espejo local de resoluciones.
pub struct AppState {
    pub config: Config,
    /// Mutable: the production flag follows the remote environment.
    pub company: RwLock<CompanyConfig>,
    pub http_client: ReqwestClient,
    pub resolutions: Arc<dyn ResolutionStore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = ReqwestClient::builder()
            .user_agent(concat!("dian-edi-bridge/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.http.request_timeout_seconds))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build Reqwest client: {}", e))?;

        Ok(Self::with_parts(config, http_client, Arc::new(InMemoryResolutionStore::new())))
    }

    pub fn with_parts(config: Config, http_client: ReqwestClient, resolutions: Arc<dyn ResolutionStore>) -> Self {
        Self {
            company: RwLock::new(config.company.clone()),
            config,
            http_client,
            resolutions,
        }
    }

    /// Snapshot of the company settings for one request.
    pub async fn company(&self) -> CompanyConfig {
        self.company.read().await.clone()
    }

    pub async fn workflow(&self) -> InvoiceWorkflow {
        InvoiceWorkflow::new(self.company().await, self.http_client.clone())
    }

    pub async fn resolution_sync(&self) -> ResolutionSync {
        ResolutionSync::new(self.resolutions.clone(), self.company().await, self.http_client.clone())
    }
}
