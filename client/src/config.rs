use std::path::PathBuf;

use clap::Args;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

const STORAGE_DIR: &str = ".ordersathi";
const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    #[arg(
        long,
        help = "Backend API base URL",
        env = "ORDERSATHI_API_URL",
        default_value = DEFAULT_API_URL
    )]
    pub api_url: Url,

    #[arg(
        long,
        help = "File holding the persisted session and preferences",
        env = "ORDERSATHI_STORAGE"
    )]
    pub storage: Option<PathBuf>,

    #[arg(
        long,
        help = "Do not keep cookies between requests",
        env = "ORDERSATHI_NO_CREDENTIALS"
    )]
    pub no_credentials: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default api url is valid"),
            storage: None,
            no_credentials: false,
        }
    }
}

impl ClientConfig {
    pub fn with_credentials(&self) -> bool {
        !self.no_credentials
    }

    /// Explicit path when given, `~/.ordersathi/storage.json` otherwise,
    /// relative to the working directory when there is no home.
    pub fn storage_path(&self) -> PathBuf {
        if let Some(path) = &self.storage {
            return path.clone();
        }
        home::home_dir()
            .map(|home| home.join(STORAGE_DIR))
            .unwrap_or_else(|| PathBuf::from(STORAGE_DIR))
            .join(STORAGE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[clap(flatten)]
        client: ClientConfig,
    }

    #[test]
    fn explicit_arguments_win() {
        let cli = TestCli::parse_from([
            "test",
            "--api-url",
            "https://shop.example.com/api",
            "--storage",
            "/tmp/os.json",
            "--no-credentials",
        ]);
        assert_eq!(cli.client.api_url.as_str(), "https://shop.example.com/api");
        assert_eq!(cli.client.storage_path(), PathBuf::from("/tmp/os.json"));
        assert!(!cli.client.with_credentials());
    }

    #[test]
    fn default_storage_path_ends_with_file_name() {
        let config = ClientConfig::default();
        assert!(config.storage_path().ends_with(".ordersathi/storage.json"));
        assert!(config.with_credentials());
    }
}
