use std::env;

/// CORS configuration for the API.
#[derive(Clone, Debug)]
pub struct CorsConfig {
    /// Origins allowed to call the API.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(origins) => Self {
                allowed_origins: origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            Err(_) => Self::default(),
        }
    }
}
