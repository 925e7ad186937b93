//! Configuration management

use crate::error::{ErrorContext, SleuthError, SleuthResult};
use crate::validation_error;
use crate::logging::LoggingConfig;
use crate::types::*;

use std::path::{Path, PathBuf};
use tracing::{debug, info};

impl Default for SleuthConfig {
    fn default() -> Self {
        Self {
            models: ModelsConfig::default(),
            web_search: WebSearchConfig::default(),
            evidence_index: EvidenceIndexConfig::default(),
            research: ResearchSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            primary: LlmConfig::openai("gpt-4o"),
            secondary: LlmConfig::openai("gpt-4o-mini"),
            synthesis: LlmConfig::openai("gpt-4o"),
        }
    }
}

impl LlmConfig {
    /// OpenAI model with the usual generation defaults
    pub fn openai(model: &str) -> Self {
        Self {
            provider: "openai".to_string(),
            model: model.to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: Some(2000),
        }
    }
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.perplexity.ai".to_string(),
            api_key: None,
            model: "sonar".to_string(),
            search_context_usage: "medium".to_string(),
            result_count: 3,
            timeout_seconds: 60,
        }
    }
}

impl Default for EvidenceIndexConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1/retrieval".to_string(),
            api_key: None,
            top_k: 5,
            rerank_depth: 5,
            similarity_floor: 0.7,
            lexical_weight: 0.5,
            timeout_seconds: 30,
        }
    }
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            max_queries: 5,
            analysis_preview_chars: 1000,
            synthesis_preview_chars: 500,
        }
    }
}

impl SleuthConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SleuthResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SleuthError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: SleuthConfig = toml::from_str(&content).map_err(|e| SleuthError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> SleuthResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| SleuthError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| SleuthError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Resolve configuration: an explicit path wins, then the default
    /// locations, then built-in defaults. Environment overrides apply last.
    pub fn load(explicit: Option<&Path>) -> SleuthResult<Self> {
        let mut config = match explicit {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                Self::from_file(path)?
            }
            None => match Self::default_paths().into_iter().find(|p| p.exists()) {
                Some(path) => {
                    info!("Loading configuration from {:?}", path);
                    Self::from_file(&path)?
                }
                None => {
                    info!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Candidate configuration files, in lookup order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|d| d.join("sleuth").join("config.toml")),
            dirs::home_dir().map(|d| d.join(".sleuth").join("config.toml")),
            Some(PathBuf::from("sleuth.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Fill secrets and endpoints from the environment
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("PERPLEXITY_API_KEY") {
            debug!("Using PERPLEXITY_API_KEY from environment");
            self.web_search.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("SLEUTH_INDEX_URL") {
            debug!(url = %url, "Using SLEUTH_INDEX_URL from environment");
            self.evidence_index.base_url = url;
        }
        if let Ok(key) = std::env::var("SLEUTH_INDEX_API_KEY") {
            self.evidence_index.api_key = Some(key);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SleuthResult<()> {
        for (role, llm) in [
            ("models.primary", &self.models.primary),
            ("models.secondary", &self.models.secondary),
            ("models.synthesis", &self.models.synthesis),
        ] {
            if llm.model.trim().is_empty() {
                return Err(validation_error!(
                    "Model name must not be empty",
                    role,
                    "config"
                ));
            }
        }

        if self.web_search.result_count == 0 {
            return Err(validation_error!(
                "Web search result_count must be greater than 0",
                "web_search.result_count",
                "config"
            ));
        }

        let index = &self.evidence_index;
        if index.top_k == 0 {
            return Err(validation_error!(
                "Evidence index top_k must be greater than 0",
                "evidence_index.top_k",
                "config"
            ));
        }
        if !(0.0..=1.0).contains(&index.similarity_floor) {
            return Err(validation_error!(
                "similarity_floor must be within [0, 1]",
                "evidence_index.similarity_floor",
                "config"
            ));
        }
        if !(0.0..=1.0).contains(&index.lexical_weight) {
            return Err(validation_error!(
                "lexical_weight must be within [0, 1]",
                "evidence_index.lexical_weight",
                "config"
            ));
        }

        let research = &self.research;
        if research.max_queries == 0 {
            return Err(validation_error!(
                "max_queries must be greater than 0",
                "research.max_queries",
                "config"
            ));
        }
        if research.analysis_preview_chars == 0 || research.synthesis_preview_chars == 0 {
            return Err(validation_error!(
                "Preview lengths must be greater than 0",
                "research.preview_chars",
                "config"
            ));
        }

        Ok(())
    }
}
