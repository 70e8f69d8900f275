//! Layered configuration for the `fable` binary.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from fable.toml)
//! - User overrides (~/.config/fable/fable.toml, then ./fable.toml)
//! - An explicit file passed on the command line
//!
//! Later sources override earlier ones key by key.

use config::{Config, File, FileFormat};
use fable_core::{CharacterProfile, IdentityReference, StoryParameters};
use fable_error::{ConfigError, FableError, FableResult};
use fable_models::{OllamaConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../fable.toml");

/// Story-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorySettings {
    /// Text-generation model
    pub model: String,
    /// Story genre
    pub genre: String,
    /// Optional plot outline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    /// Number of pages
    pub pages: usize,
    /// Directory that receives one timestamped folder per story
    pub output_dir: PathBuf,
}

/// A character as written in configuration.
///
/// # Example
///
/// ```toml
/// [support]
/// name = "Mia"
/// description = "his mother"
/// gender = "1girl"
/// tags = "adult, smiling"
/// lora = "mia-v2"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSettings {
    /// Display name
    pub name: String,
    /// Narrative description
    #[serde(default)]
    pub description: String,
    /// Gender tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Render tags
    #[serde(default)]
    pub tags: String,
    /// Identity model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lora: Option<String>,
    /// Identity model weight
    #[serde(default = "default_lora_weight")]
    pub lora_weight: f32,
}

fn default_lora_weight() -> f32 {
    1.0
}

impl CharacterSettings {
    /// Build a validated profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty.
    pub fn to_profile(&self) -> FableResult<CharacterProfile> {
        let mut builder = CharacterProfile::builder();
        builder
            .name(self.name.clone())
            .description(self.description.clone())
            .render_tags(self.tags.clone());
        if let Some(gender) = &self.gender {
            builder.gender(gender.clone());
        }
        if let Some(lora) = self.lora.as_deref().filter(|l| !l.trim().is_empty()) {
            builder.identity(IdentityReference::with_weight(lora, self.lora_weight));
        }
        Ok(builder.build()?)
    }
}

/// Top-level Fable configuration.
///
/// Loads from TOML files with a precedence system:
/// 1. Bundled defaults (fable.toml shipped with the binary)
/// 2. User config in home directory (~/.config/fable/fable.toml)
/// 3. User config in current directory (./fable.toml)
/// 4. An explicit file, when given
///
/// # Example
///
/// ```no_run
/// use fable::FableConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FableConfig::load(None)?;
/// println!("Writing stories to {}", config.story.output_dir.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FableConfig {
    /// Story-level settings
    pub story: StorySettings,
    /// Protagonist
    pub hero: CharacterSettings,
    /// Optional supporting character
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<CharacterSettings>,
    /// Ollama connection
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Transport retry policy
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn build_error(e: config::ConfigError) -> FableError {
    FableError::from(ConfigError::new(format!(
        "Failed to build configuration: {}",
        e
    )))
}

fn parse_error(e: config::ConfigError) -> FableError {
    FableError::from(ConfigError::new(format!(
        "Failed to parse configuration: {}",
        e
    )))
}

impl FableConfig {
    /// The bundled defaults alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file is invalid.
    pub fn bundled() -> FableResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .map_err(build_error)?
            .try_deserialize()
            .map_err(parse_error)
    }

    /// Load configuration with precedence: explicit file > current dir > home
    /// dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found; an
    /// explicit file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or the merged result does not
    /// deserialize.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> FableResult<Self> {
        debug!(
            "Loading configuration with precedence: explicit > current dir > home dir > bundled defaults"
        );

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let home_config = config_dir.join("fable/fable.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("fable").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .build()
            .map_err(build_error)?
            .try_deserialize()
            .map_err(parse_error)
    }

    /// Load a single file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> FableResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                FableError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(parse_error)
    }

    /// Turn the story and character settings into run parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if a character or the parameters fail validation.
    pub fn story_parameters(&self) -> FableResult<StoryParameters> {
        let mut builder = StoryParameters::builder();
        builder
            .genre(self.story.genre.clone())
            .model(self.story.model.clone())
            .page_count(self.story.pages)
            .protagonist(self.hero.to_profile()?);
        if let Some(plot) = self.story.plot.as_deref().filter(|p| !p.trim().is_empty()) {
            builder.plot(plot);
        }
        if let Some(support) = &self.support {
            builder.supporting(support.to_profile()?);
        }
        Ok(builder.build()?)
    }
}
