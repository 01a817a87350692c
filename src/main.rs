use n0t_backend::{AppState, Backend, BackendConfig, Config, create_app};

use clap::Parser;
use tracing_subscriber::EnvFilter;

// Server configuration
const HOST: &str = "0.0.0.0";
const PORT: u16 = 3000;

/// n0t backend: notes API over Firebase Authentication and Cloud Firestore
#[derive(Parser, Debug)]
#[command(name = "n0t-backend")]
#[command(about = "Notes backend delegating accounts and storage to Firebase", long_about = None)]
struct Cli {
    /// Path to an optional JSON configuration file
    #[arg(short, long, env = "CONFIG_PATH")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "HOST", default_value = HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = PORT)]
    port: u16,

    /// Service-account key file (overrides the configuration file)
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    credentials: Option<String>,

    /// Firebase web API key used to verify passwords
    #[arg(long, env = "FIREBASE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(cfg) => {
                tracing::info!("Loaded configuration from {}", path);
                cfg
            }
            Err(e) => {
                tracing::error!("Failed to load config file '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let BackendConfig::Firebase(firebase) = &mut config.backend {
        if let Some(credentials) = cli.credentials {
            firebase.credentials_path = credentials;
        }
        if let Some(api_key) = cli.api_key {
            firebase.api_key = Some(api_key);
        }
    }

    // Build the service handles once, before accepting connections
    let backend = match Backend::initialize(&config) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("Failed to initialize backend: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Login policy: {:?}", config.login);
    let app = create_app(AppState::new(backend, config.login));

    // Start server
    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("n0t backend running at http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
