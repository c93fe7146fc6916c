use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Root of the served tree; photos live in `photos/`, timelapses in `timelapses/`
    pub static_dir: PathBuf,
    pub settings_file: PathBuf,
    pub enable_cors: bool,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server_url: String,
    /// No timeout is applied when unset
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("CAMGALLERY_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("CAMGALLERY_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("CAMGALLERY_SETTINGS_FILE") {
            self.server.settings_file = PathBuf::from(v);
        }
        if let Ok(v) = env::var("CAMGALLERY_ENABLE_CORS") {
            self.server.enable_cors = v.parse().unwrap_or(self.server.enable_cors);
        }
        if let Ok(v) = env::var("CAMGALLERY_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        // Client overrides
        if let Ok(v) = env::var("CAMGALLERY_SERVER_URL") {
            self.client.server_url = v;
        }
        if let Ok(v) = env::var("CAMGALLERY_CLIENT_TIMEOUT_SECS") {
            self.client.timeout_secs = v.parse().ok();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 5000,
                static_dir: PathBuf::from("./static/"),
                settings_file: PathBuf::from("./settings.json"),
                enable_cors: true,
                enable_request_logging: true,
            },
            client: ClientConfig {
                server_url: "http://127.0.0.1:5000".to_string(),
                timeout_secs: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 80,
                static_dir: PathBuf::from("./static/"),
                settings_file: PathBuf::from("./settings.json"),
                enable_cors: false,
                enable_request_logging: false,
            },
            client: ClientConfig {
                server_url: "http://127.0.0.1:80".to_string(),
                timeout_secs: None,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
