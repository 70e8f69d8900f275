//! Story command handlers.

use super::StoryArgs;
use fable::{
    CharacterSettings, ConfigError, FableConfig, FableResult, Health, OllamaDriver,
    RetryingDriver, tell_story,
};
use std::path::Path;
use tracing::{info, instrument, warn};

impl StoryArgs {
    /// Whether any supporting-character flag other than the name was given.
    fn has_support_details(&self) -> bool {
        self.support_description.is_some()
            || self.support_gender.is_some()
            || self.support_tags.is_some()
            || self.support_lora.is_some()
    }

    /// Apply the flags on top of loaded configuration.
    pub fn apply(&self, config: &mut FableConfig) -> FableResult<()> {
        let story = &mut config.story;
        override_with(&mut story.model, &self.model);
        override_with(&mut story.genre, &self.genre);
        override_with(&mut story.pages, &self.pages);
        override_with(&mut story.output_dir, &self.output);
        if self.plot.is_some() {
            story.plot = self.plot.clone();
        }

        let hero = &mut config.hero;
        override_with(&mut hero.name, &self.hero);
        override_with(&mut hero.description, &self.hero_description);
        override_with(&mut hero.tags, &self.hero_tags);
        if self.hero_gender.is_some() {
            hero.gender = self.hero_gender.clone();
        }
        if self.lora.is_some() {
            hero.lora = self.lora.clone();
        }

        if let Some(name) = &self.support {
            let support = config.support.get_or_insert_with(|| CharacterSettings {
                name: name.clone(),
                description: String::new(),
                gender: None,
                tags: String::new(),
                lora: None,
                lora_weight: 1.0,
            });
            support.name = name.clone();
        } else if self.has_support_details() && config.support.is_none() {
            return Err(ConfigError::new(
                "Supporting character flags need --support or a [support] section",
            )
            .into());
        }

        if let Some(support) = config.support.as_mut() {
            override_with(&mut support.description, &self.support_description);
            override_with(&mut support.tags, &self.support_tags);
            if self.support_gender.is_some() {
                support.gender = self.support_gender.clone();
            }
            if self.support_lora.is_some() {
                support.lora = self.support_lora.clone();
            }
        }

        Ok(())
    }
}

fn override_with<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

fn driver(config: &FableConfig) -> FableResult<OllamaDriver> {
    OllamaDriver::with_config(config.ollama.clone())
}

/// Generate a story and write it to the configured output directory.
#[instrument(skip_all)]
pub async fn run_story(args: &StoryArgs, config_path: Option<&Path>) -> FableResult<()> {
    let mut config = FableConfig::load(config_path)?;
    args.apply(&mut config)?;
    let params = config.story_parameters()?;

    let ollama = driver(&config)?;
    if args.skip_check {
        warn!("Skipping model check");
    } else {
        ollama.validate(params.model()).await?;
    }

    let output = tell_story(
        RetryingDriver::new(ollama, config.retry),
        &params,
        &config.story.output_dir,
    )
    .await?;

    println!("\n✓ \"{}\"", output.story().title());
    println!("  Pages:    {}", output.story().pages().len());
    println!("  Output:   {}", output.dir().display());
    Ok(())
}

/// Report whether the server is up and has the model.
#[instrument(skip_all)]
pub async fn check_model(model: Option<&str>, config_path: Option<&Path>) -> FableResult<()> {
    let config = FableConfig::load(config_path)?;
    let model = model.unwrap_or(&config.story.model);
    let ollama = driver(&config)?;

    let status = ollama.health().await?;
    info!(status = ?status, "Ollama health");
    if !status.is_healthy() {
        println!("✗ Ollama at {} is not healthy: {:?}", ollama.config().base_url(), status);
    }

    ollama.validate(model).await?;
    println!("✓ {} is available at {}", model, ollama.config().base_url());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_no_flags_keeps_config() {
        let mut config = FableConfig::bundled().unwrap();
        let before = config.clone();
        StoryArgs::default().apply(&mut config).unwrap();
        assert_eq!(config, before);
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = FableConfig::bundled().unwrap();
        let args = StoryArgs {
            model: Some("llama3".to_string()),
            pages: Some(3),
            output: Some(PathBuf::from("/tmp/out")),
            hero: Some("Ada".to_string()),
            hero_gender: Some("1girl".to_string()),
            lora: Some("ada-v1".to_string()),
            ..StoryArgs::default()
        };
        args.apply(&mut config).unwrap();

        assert_eq!(config.story.model, "llama3");
        assert_eq!(config.story.pages, 3);
        assert_eq!(config.story.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.hero.name, "Ada");
        assert_eq!(config.hero.gender.as_deref(), Some("1girl"));
        assert_eq!(config.hero.lora.as_deref(), Some("ada-v1"));
        assert_eq!(config.hero.tags, "white, toddler, solo");
    }

    #[test]
    fn test_support_flag_creates_character() {
        let mut config = FableConfig::bundled().unwrap();
        let args = StoryArgs {
            support: Some("Mia".to_string()),
            support_tags: Some("adult, smiling".to_string()),
            ..StoryArgs::default()
        };
        args.apply(&mut config).unwrap();

        let params = config.story_parameters().unwrap();
        let mia = params.supporting().as_ref().unwrap();
        assert_eq!(mia.name(), "Mia");
        assert_eq!(mia.tag_line(), "adult, smiling");
    }

    #[test]
    fn test_support_details_without_name_rejected() {
        let mut config = FableConfig::bundled().unwrap();
        let args = StoryArgs {
            support_gender: Some("1girl".to_string()),
            ..StoryArgs::default()
        };
        assert!(args.apply(&mut config).is_err());
    }
}
