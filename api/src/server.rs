use crate::{create_router, AppState};
use std::fmt;
use std::str::FromStr;
use store::Store;
use tokio::task::JoinHandle;
use tracing::info;

/// How the permission guard decides who owns a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnershipMode {
    /// Owners and associates come from the stored records.
    #[default]
    Index,
    /// The caller owns a resource when their id appears inside its id.
    Containment,
}

impl fmt::Display for OwnershipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnershipMode::Index => write!(f, "index"),
            OwnershipMode::Containment => write!(f, "containment"),
        }
    }
}

impl FromStr for OwnershipMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "index" => Ok(OwnershipMode::Index),
            "containment" => Ok(OwnershipMode::Containment),
            other => Err(format!(
                "unknown ownership mode '{}', expected 'index' or 'containment'",
                other
            )),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Origin allowed by CORS, with credentials
    pub frontend_url: String,
    pub ownership: OwnershipMode,
    /// Load the demo projects, tasks and users on startup
    pub seed_data: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            frontend_url: "http://localhost:3000".to_string(),
            ownership: OwnershipMode::default(),
            seed_data: true,
        }
    }
}

impl ApiConfig {
    /// Create a new API configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = url.into();
        self
    }

    pub fn with_ownership(mut self, ownership: OwnershipMode) -> Self {
        self.ownership = ownership;
        self
    }

    /// Set whether to load the demo data
    pub fn with_seed_data(mut self, seed: bool) -> Self {
        self.seed_data = seed;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Start the API server with the given configuration
pub async fn start_server_with_config(config: ApiConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = if config.seed_data {
        info!("Loading demo data");
        Store::seeded()
    } else {
        Store::in_memory()
    };

    let addr = config.bind_address();
    info!(
        "Ownership mode: {}, allowed origin: {}",
        config.ownership, config.frontend_url
    );

    let state = AppState::new(store, config.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on {}", addr);
    info!(
        "Swagger UI available at http://localhost:{}/api/swagger",
        config.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Start the API server with default configuration
pub async fn start_server() -> Result<(), Box<dyn std::error::Error>> {
    start_server_with_config(ApiConfig::default()).await
}

/// Start the API server in a background task with custom configuration
pub fn spawn_server_with_config(config: ApiConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = start_server_with_config(config).await {
            tracing::error!("API server error: {}", e);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.ownership, OwnershipMode::Index);
        assert!(config.seed_data);
    }

    #[test]
    fn test_builder() {
        let config = ApiConfig::new()
            .with_host("127.0.0.1")
            .with_port(8080)
            .with_ownership(OwnershipMode::Containment)
            .with_seed_data(false);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.ownership, OwnershipMode::Containment);
        assert!(!config.seed_data);
    }

    #[test]
    fn test_ownership_mode_parsing() {
        assert_eq!("index".parse::<OwnershipMode>(), Ok(OwnershipMode::Index));
        assert_eq!(
            " Containment ".parse::<OwnershipMode>(),
            Ok(OwnershipMode::Containment)
        );
        assert!("owner".parse::<OwnershipMode>().is_err());
        assert_eq!(OwnershipMode::Containment.to_string(), "containment");
    }
}
