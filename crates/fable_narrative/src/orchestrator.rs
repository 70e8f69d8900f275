//! Story orchestration.
//!
//! This module provides the orchestrator that turns story parameters into
//! pages by threading one conversation through a fixed chain of exchanges.

use crate::pipeline::{PAGE_PIPELINE, PageStage, PageWork};
use crate::responses::{
    BackgroundReply, DescriptionReply, NamesReply, StoryReply, TitleReply, VisibleCharactersReply,
};
use crate::{ConversationThread, extraction, prompts};
use fable_core::{CharacterRegistry, StoryPage, StoryParameters, StorySet};
use fable_error::{ExchangeStep, FableResult, StoryError, StoryErrorKind};
use fable_interface::ExchangeDriver;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Drives a text-generation service through a story run.
///
/// Exchanges happen strictly one after another, each continuing from the
/// context the previous one returned:
///
/// 1. the story paragraphs,
/// 2. a title,
/// 3. the names of the characters that matter,
/// 4. for every page, the stages of [`PAGE_PIPELINE`].
///
/// Any malformed reply or transport failure ends the run with an error and no
/// partial story. Retrying is left to the driver
/// (see `fable_models::RetryingDriver`).
///
/// # Example
///
/// ```rust,ignore
/// use fable_narrative::StoryOrchestrator;
/// use fable_models::OllamaDriver;
///
/// let orchestrator = StoryOrchestrator::new(OllamaDriver::new()?);
/// let story = orchestrator.create_story(&params).await?;
/// let cover = orchestrator.create_title_page(&params, &story).await?;
/// ```
pub struct StoryOrchestrator<D: ExchangeDriver> {
    driver: D,
}

impl<D: ExchangeDriver> StoryOrchestrator<D> {
    /// Create an orchestrator over the given driver.
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    /// The underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run a full story with an entropy-seeded random source.
    ///
    /// # Errors
    ///
    /// Returns an error if any exchange fails or any reply is malformed.
    pub async fn create_story(&self, params: &StoryParameters) -> FableResult<StorySet> {
        let mut rng = StdRng::from_entropy();
        self.create_story_with_rng(params, &mut rng).await
    }

    /// Run a full story, choosing each page's featured character with `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if any exchange fails or any reply is malformed.
    #[tracing::instrument(skip_all, fields(model = %params.model(), protagonist = %params.protagonist().name(), pages = params.page_count()))]
    pub async fn create_story_with_rng<R>(
        &self,
        params: &StoryParameters,
        rng: &mut R,
    ) -> FableResult<StorySet>
    where
        R: Rng + Send,
    {
        let mut thread = ConversationThread::new(&self.driver, params.model().clone());

        let narrative_reply = thread
            .exchange(ExchangeStep::Narrative, prompts::narrative(params))
            .await?;
        let story: StoryReply = extraction::parse_reply(ExchangeStep::Narrative, &narrative_reply)?;
        story.validate(*params.page_count(), &narrative_reply)?;
        let mut pages: Vec<StoryPage> = story
            .story
            .into_iter()
            .map(|page| StoryPage::new(page.paragraph))
            .collect();
        tracing::info!(pages = pages.len(), "Narrative generated");

        let title: TitleReply = thread.ask(ExchangeStep::Title, prompts::title()).await?;
        tracing::info!(title = %title.story_name, "Title generated");

        let names: NamesReply = thread
            .ask(ExchangeStep::CharacterNames, prompts::character_names(params))
            .await?;
        tracing::debug!(names = ?names.names, "Character vocabulary");

        let mut registry = CharacterRegistry::new();
        if let Some(supporting) = params.supporting() {
            registry.register(supporting.name().clone(), supporting.render_prefix());
        }

        let mut run = StoryRun {
            params,
            thread,
            registry,
            vocabulary: names.names,
            rng,
        };
        for (index, page) in pages.iter_mut().enumerate() {
            run.process_page(index, page).await?;
        }

        let StoryRun {
            thread, registry, ..
        } = run;
        tracing::info!(
            exchanges = thread.exchanges(),
            characters = registry.len(),
            "Story complete"
        );

        Ok(StorySet::new(
            pages,
            title.story_name,
            registry,
            thread.into_context(),
        ))
    }
}

/// Mutable state of one story run while pages are processed.
struct StoryRun<'a, D, R> {
    params: &'a StoryParameters,
    thread: ConversationThread<'a, D>,
    registry: CharacterRegistry,
    vocabulary: Vec<String>,
    rng: &'a mut R,
}

impl<D, R> StoryRun<'_, D, R>
where
    D: ExchangeDriver,
    R: Rng + Send,
{
    #[tracing::instrument(skip(self, page))]
    async fn process_page(&mut self, index: usize, page: &mut StoryPage) -> FableResult<()> {
        let mut work = PageWork::new(index, page.paragraph().clone());
        for stage in PAGE_PIPELINE {
            tracing::debug!(stage = %stage, "Running page stage");
            self.run_stage(stage, &mut work, page).await?;
        }
        tracing::info!(
            candidates = work.candidates.len(),
            chosen = ?work.chosen,
            regions = page.uses_regions(),
            "Page complete"
        );
        Ok(())
    }

    async fn run_stage(
        &mut self,
        stage: PageStage,
        work: &mut PageWork,
        page: &mut StoryPage,
    ) -> FableResult<()> {
        let params = self.params;
        let protagonist = params.protagonist();
        match stage {
            PageStage::DetectCharacters => {
                let reply: VisibleCharactersReply = self
                    .thread
                    .ask(
                        ExchangeStep::VisibleCharacters(work.index),
                        prompts::visible_characters(&work.paragraph, &self.vocabulary),
                    )
                    .await?;
                work.people = reply.people();
                work.animals = reply.animals();
            }
            PageStage::FilterProtagonist => work.filter_candidates(protagonist.name()),
            PageStage::SeedSupporting => {
                if let Some(supporting) = params.supporting() {
                    self.registry
                        .register(supporting.name().clone(), supporting.render_prefix());
                }
            }
            PageStage::RegisterCharacters => {
                for name in &work.candidates {
                    if self.registry.contains(name) {
                        continue;
                    }
                    let is_person = work.people.contains(name);
                    let reply: DescriptionReply = self
                        .thread
                        .ask(
                            ExchangeStep::CharacterDescription(work.index),
                            prompts::character_description(name, protagonist.name(), is_person),
                        )
                        .await?;
                    self.registry.register(name.clone(), reply.description);
                }
            }
            PageStage::DescribeReaction => {
                let Some(chosen) = work.candidates.choose(&mut *self.rng).cloned() else {
                    return Ok(());
                };
                let reply: DescriptionReply = self
                    .thread
                    .ask(
                        ExchangeStep::CharacterReaction(work.index),
                        prompts::character_reaction(&chosen, &work.paragraph, protagonist.name()),
                    )
                    .await?;
                let description = self.registry.get(&chosen).ok_or_else(|| {
                    StoryError::new(StoryErrorKind::UnregisteredCharacter(chosen.clone()))
                })?;
                page.set_render_prompt_secondary(format!("{}, {}", description, reply.description));
                work.chosen = Some(chosen);
            }
            PageStage::DescribeBackground => {
                let reply: BackgroundReply = self
                    .thread
                    .ask(
                        ExchangeStep::Background(work.index),
                        prompts::background(
                            &work.paragraph,
                            protagonist.name(),
                            work.chosen.as_deref(),
                        ),
                    )
                    .await?;
                page.set_background(reply.background);
            }
            PageStage::DescribeProtagonist => {
                if !work.protagonist_visible(protagonist.name()) {
                    return Ok(());
                }
                let reply: DescriptionReply = self
                    .thread
                    .ask(
                        ExchangeStep::ProtagonistReaction(work.index),
                        prompts::protagonist_reaction(
                            &work.paragraph,
                            protagonist,
                            work.chosen.as_deref(),
                        ),
                    )
                    .await?;
                page.set_render_prompt_primary(protagonist.render_prompt(&reply.description));
            }
        }
        Ok(())
    }
}
