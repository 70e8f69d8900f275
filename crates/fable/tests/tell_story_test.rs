use async_trait::async_trait;
use fable::{
    CharacterProfile, ConversationContext, ExchangeDriver, ExchangeError, ExchangeErrorKind,
    ExchangeRequest, ExchangeResponse, FableConfig, FableResult, METADATA_FILE, STORY_FILE,
    StoryMetadata, StoryPage, StoryParameters, TITLE_PAGE_BACKGROUND, tell_story,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock driver that replays scripted replies.
struct ScriptedDriver {
    replies: Mutex<VecDeque<&'static str>>,
    calls: Mutex<usize>,
}

impl ScriptedDriver {
    fn new(replies: &[&'static str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().copied().collect()),
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ExchangeDriver for ScriptedDriver {
    async fn exchange(&self, _req: &ExchangeRequest) -> FableResult<ExchangeResponse> {
        let count = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => Ok(ExchangeResponse::new(
                reply,
                ConversationContext::from_tokens(vec![count as i64]),
            )),
            None => Err(ExchangeError::new(ExchangeErrorKind::ServerNotRunning(
                "http://localhost:11434".to_string(),
            )))?,
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

const NAP_STORY: &[&str] = &[
    r#"{"story":[{"paragraph":"Gavin naps."}]}"#,
    r#"{"story_name":"Nap Time"}"#,
    r#"{"names":["Gavin"]}"#,
    r#"{"people":["Gavin"],"animals":[]}"#,
    r#"{"background":"a quiet nursery"}"#,
    r#"{"description":"sleeping soundly"}"#,
    r#"{"description":"yawning under the title"}"#,
];

fn params() -> StoryParameters {
    StoryParameters::builder()
        .protagonist(
            CharacterProfile::builder()
                .name("Gavin")
                .description("a boy toddler")
                .render_tags("toddler")
                .build()
                .unwrap(),
        )
        .page_count(1usize)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_tell_story_writes_story_and_metadata() {
    let tmp = tempfile::tempdir().unwrap();
    let driver = ScriptedDriver::new(NAP_STORY);

    let output = tell_story(&driver, &params(), tmp.path())
        .await
        .expect("Story run failed");

    assert_eq!(driver.calls(), 7);
    assert!(output.dir().starts_with(tmp.path()));
    assert_eq!(output.story().title(), "Nap Time");

    let pages: Vec<StoryPage> =
        serde_json::from_str(&std::fs::read_to_string(output.dir().join(STORY_FILE)).unwrap())
            .unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].background(), "a quiet nursery");
    assert_eq!(
        pages[0].render_prompt_primary().as_deref(),
        Some("toddler, sleeping soundly")
    );

    let metadata: StoryMetadata =
        serde_json::from_str(&std::fs::read_to_string(output.dir().join(METADATA_FILE)).unwrap())
            .unwrap();
    assert_eq!(&metadata, output.metadata());
    assert_eq!(metadata.hero(), "Gavin");
    assert_eq!(metadata.model(), "mistral");
    assert_eq!(metadata.use_regions(), &vec![false]);
    assert_eq!(metadata.title_page().paragraph(), "Nap Time");
    assert_eq!(metadata.title_page().background(), TITLE_PAGE_BACKGROUND);
    assert_eq!(
        metadata.title_page().render_prompt_primary().as_deref(),
        Some("toddler, yawning under the title")
    );
}

#[tokio::test]
async fn test_failed_run_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    // Service goes away before the title page.
    let driver = ScriptedDriver::new(&NAP_STORY[..6]);

    let err = tell_story(&driver, &params(), tmp.path())
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn test_config_file_layers_over_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("custom.toml");
    std::fs::write(
        &path,
        r#"
[story]
pages = 3
plot = "they build a treehouse"

[support]
name = "Mia"
description = "his mother"
gender = "1girl"
tags = "adult"
lora = "mia-v2"
lora_weight = 0.8

[ollama]
base_url = "http://gpu-box:11434"
"#,
    )
    .unwrap();

    let config = FableConfig::from_file(&path).unwrap();
    assert_eq!(config.story.pages, 3);
    assert_eq!(config.story.model, "mistral");
    assert_eq!(config.hero.name, "Gavin");
    assert_eq!(config.ollama.base_url(), "http://gpu-box:11434");
    assert_eq!(*config.ollama.timeout_secs(), 300);

    let params = config.story_parameters().unwrap();
    assert_eq!(*params.page_count(), 3);
    assert_eq!(params.plot().as_deref(), Some("they build a treehouse"));
    assert_eq!(
        params.supporting().as_ref().unwrap().render_prefix(),
        "<lora:mia-v2:0.8>1girl, adult"
    );
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = FableConfig::load(Some(&tmp.path().join("nope.toml"))).unwrap_err();
    assert!(err.to_string().contains("Configuration Error"));
}

#[test]
fn test_zero_pages_in_config_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("zero.toml");
    std::fs::write(&path, "[story]\npages = 0\n").unwrap();

    let config = FableConfig::from_file(&path).unwrap();
    assert!(config.story_parameters().is_err());
}
