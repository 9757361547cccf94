use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, only ever attached to outbound watch-provider requests
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Movie catalog / recommendation backend base URL
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Image CDN base URL, size segment is appended per image
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Region key read from watch-provider results
    #[serde(default = "default_watch_region")]
    pub watch_region: String,

    /// How long a page render waits for each region before sending it as loading
    #[serde(default = "default_render_deadline_ms")]
    pub render_deadline_ms: u64,

    /// Comma-separated list of origins allowed by CORS
    #[serde(default)]
    pub allowed_origins: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_catalog_api_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_watch_region() -> String {
    "AR".to_string()
}

fn default_render_deadline_ms() -> u64 {
    1500
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("TMDB_API_KEY must not be empty");
        }
        if self.render_deadline_ms == 0 {
            anyhow::bail!("RENDER_DEADLINE_MS must be positive");
        }
        if self.watch_region.len() != 2 {
            anyhow::bail!(
                "WATCH_REGION must be a two-letter region code, got {:?}",
                self.watch_region
            );
        }
        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Origins parsed from `allowed_origins`, empty entries dropped
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("tmdb_api_key", &"<redacted>")
            .field("tmdb_api_url", &self.tmdb_api_url)
            .field("catalog_api_url", &self.catalog_api_url)
            .field("image_base_url", &self.image_base_url)
            .field("watch_region", &self.watch_region)
            .field("render_deadline_ms", &self.render_deadline_ms)
            .field("allowed_origins", &self.allowed_origins)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn test_config(tmdb_api_url: &str, catalog_api_url: &str) -> Config {
    Config {
        tmdb_api_key: "test_key".to_string(),
        tmdb_api_url: tmdb_api_url.to_string(),
        catalog_api_url: catalog_api_url.to_string(),
        image_base_url: default_image_base_url(),
        watch_region: default_watch_region(),
        render_deadline_ms: default_render_deadline_ms(),
        allowed_origins: None,
        host: default_host(),
        port: default_port(),
    }
}
