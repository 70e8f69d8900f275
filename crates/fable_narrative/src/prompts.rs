//! Prompt text for every exchange in a story run.
//!
//! Each prompt asks for a JSON reply whose keys match a type in
//! [`responses`](crate::responses).

use fable_core::{CharacterProfile, StoryParameters};

const NO_PRONOUNS: &str = r#"Do not use the words "they", "them", or "their"."#;
const NO_COLOURS: &str = "Do not mention hair, eye, or skin colour.";
const DESCRIPTION_FORMAT: &str = r#"Respond in JSON with the following format: {
  "description": the description as a string - do not return an array
}"#;

fn narrative_description(profile: &CharacterProfile) -> &str {
    if profile.description().trim().is_empty() {
        "a character"
    } else {
        profile.description()
    }
}

/// Step 1: the paragraphs of the story.
pub fn narrative(params: &StoryParameters) -> String {
    let protagonist = params.protagonist();
    let plot = params
        .plot()
        .as_deref()
        .filter(|plot| !plot.trim().is_empty())
        .map(|plot| format!("where {} ", plot))
        .unwrap_or_default();
    let supporting = params
        .supporting()
        .as_ref()
        .map(|support| {
            format!(
                "Include a person named {} that is {}.\n",
                support.name(),
                narrative_description(support)
            )
        })
        .unwrap_or_default();

    format!(
        "Make me a {genre} about {description} named {name} {plot}in {pages} separate parts.\n\
         {NO_COLOURS}\n\
         {supporting}\n\
         Respond in JSON by placing an array in a key called story that holds each part.\n\
         Each array element contains an object with the following format: {{ \"paragraph\": the paragraph as a string }}",
        genre = params.genre(),
        description = narrative_description(protagonist),
        name = protagonist.name(),
        pages = params.page_count(),
    )
}

/// Step 2: a title.
pub fn title() -> String {
    "What would be a good name for this story? Make it brief and catchy. \
     Respond in JSON with the following format: {\n  \"story_name\": the name as a string\n}"
        .to_string()
}

/// Step 3: the names to detect characters by.
pub fn character_names(params: &StoryParameters) -> String {
    let supporting = params
        .supporting()
        .as_ref()
        .map(|support| format!("Include {} in the list.\n", support.name()))
        .unwrap_or_default();

    format!(
        "Tell me names we can use to refer to the people and animals in the story.\n\
         Only include important characters.\n\
         Include {name} in the list.\n\
         {supporting}\
         Respond in JSON by placing an array of the names as strings in a key called names",
        name = params.protagonist().name(),
    )
}

/// Who is visible in a paragraph.
pub fn visible_characters(paragraph: &str, names: &[String]) -> String {
    format!(
        "Using this paragraph, tell me what people or animals are visible: \"{paragraph}\".\n\
         Refer to them by name from this list: {names}.\n\
         Assume that any use of the word \"they\", \"them\", or \"their\" means the people and animals in the story.\n\
         Only include the names of the people and animals that are explicitly mentioned.\n\
         Respond in JSON with the following format: {{\n  \"people\": a list of the people,\n  \"animals\": a list of the animals\n}}",
        names = names.join(", "),
    )
}

/// What a newly seen character looks like.
pub fn character_description(character: &str, protagonist: &str, is_person: bool) -> String {
    let person = if is_person {
        "Include their gender as \"a man\", or \"a woman\".\nInclude their ethnicity.\n"
    } else {
        ""
    };

    format!(
        "Be creative and in a single sentence describe what {character} looks like.\n\
         {person}\
         Do not mention {protagonist} or any other characters.\n\
         {DESCRIPTION_FORMAT}"
    )
}

/// How the chosen character reacts to a paragraph.
pub fn character_reaction(character: &str, paragraph: &str, protagonist: &str) -> String {
    format!(
        "Be creative and in a single sentence describe how {character} would react to this paragraph: \"{paragraph}\".\n\
         Do not mention {protagonist} or any other characters.\n\
         {NO_PRONOUNS}\n\
         {DESCRIPTION_FORMAT}"
    )
}

/// What the scene of a paragraph looks like.
pub fn background(paragraph: &str, protagonist: &str, chosen: Option<&str>) -> String {
    let excluded = match chosen {
        Some(character) => format!("{protagonist}, {character},"),
        None => protagonist.to_string(),
    };

    format!(
        "Be creative and in a sentence or two describe what the scene looks like in this paragraph: \"{paragraph}\".\n\
         Do not mention {excluded} or any other characters.\n\
         Respond in JSON with the following format: {{\n  \"background\": the description as a string - do not return an array\n}}"
    )
}

/// How the protagonist reacts to a paragraph.
pub fn protagonist_reaction(
    paragraph: &str,
    protagonist: &CharacterProfile,
    chosen: Option<&str>,
) -> String {
    let exclusion = chosen
        .map(|character| format!("Do not mention {character} or any other characters.\n"))
        .unwrap_or_default();

    format!(
        "Be creative and in a single sentence describe how {name} would react to this paragraph: \"{paragraph}\".\n\
         Ensure we respect their description: {tags}.\n\
         {NO_COLOURS}\n\
         {exclusion}\
         {NO_PRONOUNS}\n\
         {DESCRIPTION_FORMAT}",
        name = protagonist.name(),
        tags = protagonist.tag_line(),
    )
}

/// How a character looks on the cover of the book.
///
/// `other` is the character the description must leave out.
pub fn cover(title: &str, character: &CharacterProfile, other: Option<&str>) -> String {
    let exclusion = other
        .map(|name| format!("Do not mention {name} or any other characters.\n"))
        .unwrap_or_default();

    format!(
        "Be creative and in a single sentence describe how {name} would look on the cover of a book called {title}.\n\
         Ensure we respect their description: {tags}.\n\
         {NO_COLOURS}\n\
         {exclusion}\
         {NO_PRONOUNS}\n\
         {DESCRIPTION_FORMAT}",
        name = character.name(),
        tags = character.tag_line(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(with_support: bool, plot: Option<&str>) -> StoryParameters {
        let mut builder = StoryParameters::builder();
        builder
            .protagonist(
                CharacterProfile::builder()
                    .name("Gavin")
                    .description("a boy toddler")
                    .render_tags("toddler")
                    .gender("male")
                    .build()
                    .unwrap(),
            )
            .page_count(4usize);
        if with_support {
            builder.supporting(
                CharacterProfile::builder()
                    .name("Mia")
                    .description("his mother")
                    .build()
                    .unwrap(),
            );
        }
        if let Some(plot) = plot {
            builder.plot(plot);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_narrative_prompt_mentions_inputs() {
        let prompt = narrative(&params(true, Some("he finds a puppy")));
        assert!(prompt.starts_with(
            "Make me a children's story about a boy toddler named Gavin where he finds a puppy in 4 separate parts."
        ));
        assert!(prompt.contains("Include a person named Mia that is his mother."));
        assert!(prompt.contains("key called story"));
    }

    #[test]
    fn test_narrative_prompt_without_optionals() {
        let prompt = narrative(&params(false, None));
        assert!(prompt.contains("named Gavin in 4 separate parts."));
        assert!(!prompt.contains("Include a person"));
        assert!(!prompt.contains("where"));
    }

    #[test]
    fn test_names_prompt_includes_supporting() {
        assert!(character_names(&params(true, None)).contains("Include Mia in the list."));
        assert!(!character_names(&params(false, None)).contains("Mia"));
    }

    #[test]
    fn test_description_prompt_for_animals_skips_gender() {
        let person = character_description("Mia", "Gavin", true);
        let animal = character_description("Dog", "Gavin", false);
        assert!(person.contains("ethnicity"));
        assert!(!animal.contains("ethnicity"));
        assert!(animal.contains("Do not mention Gavin"));
    }

    #[test]
    fn test_background_prompt_excludes_chosen() {
        assert!(background("p", "Gavin", Some("Dog")).contains("Do not mention Gavin, Dog, or any"));
        assert!(background("p", "Gavin", None).contains("Do not mention Gavin or any"));
    }

    #[test]
    fn test_protagonist_prompt_uses_tag_line() {
        let params = params(false, None);
        let prompt = protagonist_reaction("p", params.protagonist(), None);
        assert!(prompt.contains("respect their description: male, toddler."));
    }
}
