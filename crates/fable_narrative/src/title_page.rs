//! Cover page synthesis.

use crate::responses::DescriptionReply;
use crate::{ConversationThread, StoryOrchestrator, prompts};
use fable_core::{StoryPage, StoryParameters, StorySet};
use fable_error::{ExchangeStep, FableResult, StoryError, StoryErrorKind};
use fable_interface::ExchangeDriver;

/// Scenery used behind every cover.
pub const TITLE_PAGE_BACKGROUND: &str =
    "a beautiful landscape, with a clear blue sky and a few fluffy clouds";

impl<D: ExchangeDriver> StoryOrchestrator<D> {
    /// Compose the cover page of a finished story.
    ///
    /// Continues the story's conversation: one exchange for the protagonist,
    /// and one more for the supporting character if there is one. The page's
    /// paragraph is the title.
    ///
    /// # Errors
    ///
    /// Returns an error if an exchange fails, a reply is malformed, or the
    /// supporting character is missing from the story's registry.
    #[tracing::instrument(skip_all, fields(title = %story.title()))]
    pub async fn create_title_page(
        &self,
        params: &StoryParameters,
        story: &StorySet,
    ) -> FableResult<StoryPage> {
        let protagonist = params.protagonist();
        let supporting = params.supporting().as_ref();
        let mut thread = ConversationThread::resume(
            self.driver(),
            params.model().clone(),
            Some(story.context().clone()),
        );

        let mut page = StoryPage::new(story.title().clone());
        page.set_background(TITLE_PAGE_BACKGROUND);

        let cover: DescriptionReply = thread
            .ask(
                ExchangeStep::CoverProtagonist,
                prompts::cover(
                    story.title(),
                    protagonist,
                    supporting.map(|s| s.name().as_str()),
                ),
            )
            .await?;
        page.set_render_prompt_primary(protagonist.render_prompt(&cover.description));

        if let Some(supporting) = supporting {
            let cover: DescriptionReply = thread
                .ask(
                    ExchangeStep::CoverSupporting,
                    prompts::cover(story.title(), supporting, Some(protagonist.name())),
                )
                .await?;
            let description = story.characters().get(supporting.name()).ok_or_else(|| {
                StoryError::new(StoryErrorKind::MissingSupportingCharacter(
                    supporting.name().clone(),
                ))
            })?;
            page.set_render_prompt_secondary(format!("{}, {}", description, cover.description));
        }

        tracing::info!(regions = page.uses_regions(), "Title page complete");
        Ok(page)
    }
}
