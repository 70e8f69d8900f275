//! One end-to-end story run: story, title page, files on disk.

use crate::output::{StoryMetadata, write_story};
use fable_core::{StoryParameters, StorySet};
use fable_error::FableResult;
use fable_interface::ExchangeDriver;
use fable_narrative::StoryOrchestrator;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// What a completed run left behind.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct StoryOutput {
    /// Directory holding `story.json` and `metadata.json`
    dir: PathBuf,
    /// The generated story
    story: StorySet,
    /// The metadata written next to it
    metadata: StoryMetadata,
}

/// Generate a story and its title page with `driver`, then write both under
/// `output_root`.
///
/// Nothing is written unless every exchange succeeds.
///
/// # Errors
///
/// Returns the first transport, structured-response, or persistence error.
#[instrument(skip_all, fields(
    provider = driver.provider_name(),
    model = %params.model(),
    pages = params.page_count(),
))]
pub async fn tell_story<D: ExchangeDriver>(
    driver: D,
    params: &StoryParameters,
    output_root: &Path,
) -> FableResult<StoryOutput> {
    let orchestrator = StoryOrchestrator::new(driver);
    let story = orchestrator.create_story(params).await?;
    let title_page = orchestrator.create_title_page(params, &story).await?;

    let metadata = StoryMetadata::new(params, &story, title_page);
    let dir = write_story(output_root, &story, &metadata).await?;

    info!(title = %story.title(), dir = %dir.display(), "Story complete");
    Ok(StoryOutput {
        dir,
        story,
        metadata,
    })
}
