//! Persisting a finished story to disk.

use fable_core::{CharacterRegistry, StoryPage, StoryParameters, StorySet};
use fable_error::{FableResult, JsonError, StorageError, StorageErrorKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// File holding the story pages.
pub const STORY_FILE: &str = "story.json";
/// File holding the story metadata.
pub const METADATA_FILE: &str = "metadata.json";

/// Everything a downstream renderer needs besides the pages themselves.
///
/// Serialized with camelCase keys alongside `story.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct StoryMetadata {
    /// Story title
    title: String,
    /// Cover page
    title_page: StoryPage,
    /// Protagonist name
    hero: String,
    /// Supporting character name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    support: Option<String>,
    /// Protagonist render tags, identity reference included
    hero_tags: String,
    /// Model that wrote the story
    model: String,
    /// Per page, whether two render regions are needed
    use_regions: Vec<bool>,
    /// Registered physical descriptions
    characters: CharacterRegistry,
}

impl StoryMetadata {
    /// Collect metadata for a finished story.
    pub fn new(params: &StoryParameters, story: &StorySet, title_page: StoryPage) -> Self {
        Self {
            title: story.title().clone(),
            title_page,
            hero: params.protagonist().name().clone(),
            support: params.supporting().as_ref().map(|c| c.name().clone()),
            hero_tags: params.protagonist().render_prefix(),
            model: params.model().clone(),
            use_regions: story.pages().iter().map(StoryPage::uses_regions).collect(),
            characters: story.characters().clone(),
        }
    }
}

fn to_json<T: Serialize>(value: &T, what: &str) -> FableResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| JsonError::new(format!("Failed to serialize {}: {}", what, e)).into())
}

async fn write_file(path: PathBuf, contents: String) -> FableResult<()> {
    tokio::fs::write(&path, contents).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })?;
    debug!(path = %path.display(), "Wrote output file");
    Ok(())
}

/// Write `story.json` and `metadata.json` into a new directory under `root`
/// named after the current Unix timestamp.
///
/// Returns the directory written to.
///
/// # Errors
///
/// Returns a [`StorageError`] if the directory already exists or a file
/// cannot be written, and a [`JsonError`] if serialization fails.
#[instrument(skip_all, fields(root = %root.as_ref().display(), pages = story.pages().len()))]
pub async fn write_story(
    root: impl AsRef<Path>,
    story: &StorySet,
    metadata: &StoryMetadata,
) -> FableResult<PathBuf> {
    let timestamp = chrono::Utc::now().timestamp();
    let dir = root.as_ref().join(timestamp.to_string());
    write_story_to(&dir, story, metadata).await?;
    Ok(dir)
}

/// Write `story.json` and `metadata.json` into `dir`, which must not exist
/// yet. Missing parent directories are created.
///
/// # Errors
///
/// Same as [`write_story`].
#[instrument(skip_all, fields(dir = %dir.display()))]
pub async fn write_story_to(
    dir: &Path,
    story: &StorySet,
    metadata: &StoryMetadata,
) -> FableResult<()> {
    let story_json = to_json(story.pages(), "story pages")?;
    let metadata_json = to_json(metadata, "story metadata")?;

    if let Some(parent) = dir.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation {
                path: parent.display().to_string(),
                message: e.to_string(),
            })
        })?;
    }
    tokio::fs::create_dir(dir).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            StorageError::new(StorageErrorKind::AlreadyExists(dir.display().to_string()))
        } else {
            StorageError::new(StorageErrorKind::DirectoryCreation {
                path: dir.display().to_string(),
                message: e.to_string(),
            })
        }
    })?;

    tokio::try_join!(
        write_file(dir.join(STORY_FILE), story_json),
        write_file(dir.join(METADATA_FILE), metadata_json),
    )?;

    info!(dir = %dir.display(), "Story written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fable_core::{CharacterProfile, ConversationContext, IdentityReference};

    fn params() -> StoryParameters {
        StoryParameters::builder()
            .protagonist(
                CharacterProfile::builder()
                    .name("Gavin")
                    .render_tags("toddler")
                    .gender("1boy")
                    .identity(IdentityReference::new("gavin-15"))
                    .build()
                    .unwrap(),
            )
            .page_count(2usize)
            .build()
            .unwrap()
    }

    fn story() -> StorySet {
        let mut first = StoryPage::new("Gavin pets a dog.");
        first.set_background("a backyard");
        first.set_render_prompt_primary("<lora:gavin-15:1>1boy, toddler, smiling");
        first.set_render_prompt_secondary("a scruffy terrier, wagging");
        let mut second = StoryPage::new("The sun sets.");
        second.set_background("a hill at dusk");

        let mut characters = CharacterRegistry::new();
        characters.register("Dog", "a scruffy terrier");

        StorySet::new(
            vec![first, second],
            "Gavin's Dog".to_string(),
            characters,
            ConversationContext::from_tokens(vec![9]),
        )
    }

    #[test]
    fn test_metadata_collects_story_facts() {
        let story = story();
        let metadata = StoryMetadata::new(&params(), &story, StoryPage::new("Gavin's Dog"));

        assert_eq!(metadata.hero(), "Gavin");
        assert!(metadata.support().is_none());
        assert_eq!(metadata.hero_tags(), "<lora:gavin-15:1>1boy, toddler");
        assert_eq!(metadata.use_regions(), &vec![true, false]);

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["useRegions"], serde_json::json!([true, false]));
        assert_eq!(json["characters"]["Dog"], "a scruffy terrier");
        assert_eq!(json["titlePage"]["paragraph"], "Gavin's Dog");
        assert!(json.get("support").is_none());
    }

    #[tokio::test]
    async fn test_write_story_to_creates_both_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("run");
        let story = story();
        let metadata = StoryMetadata::new(&params(), &story, StoryPage::new("Gavin's Dog"));

        write_story_to(&dir, &story, &metadata).await.unwrap();

        let pages: Vec<StoryPage> =
            serde_json::from_str(&std::fs::read_to_string(dir.join(STORY_FILE)).unwrap()).unwrap();
        assert_eq!(pages, story.pages().clone());

        let restored: StoryMetadata =
            serde_json::from_str(&std::fs::read_to_string(dir.join(METADATA_FILE)).unwrap())
                .unwrap();
        assert_eq!(restored, metadata);
    }

    #[tokio::test]
    async fn test_existing_directory_is_not_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let story = story();
        let metadata = StoryMetadata::new(&params(), &story, StoryPage::new("Gavin's Dog"));

        let err = write_story_to(tmp.path(), &story, &metadata)
            .await
            .unwrap_err();

        assert!(matches!(
            err.kind(),
            fable_error::FableErrorKind::Storage(StorageError {
                kind: StorageErrorKind::AlreadyExists(_),
                ..
            })
        ));
    }
}
