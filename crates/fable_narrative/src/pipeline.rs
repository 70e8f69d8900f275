//! The named stages every page goes through, in order.

/// One stage of per-page processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PageStage {
    /// Ask who is visible in the paragraph
    #[display("detect characters")]
    DetectCharacters,
    /// Drop the protagonist and blanks, leaving the candidate set
    #[display("filter protagonist")]
    FilterProtagonist,
    /// Make sure the supporting character has its caller-given description
    #[display("seed supporting")]
    SeedSupporting,
    /// Describe every candidate the registry has not seen yet
    #[display("register characters")]
    RegisterCharacters,
    /// Pick one candidate and describe their reaction
    #[display("describe reaction")]
    DescribeReaction,
    /// Describe the scenery
    #[display("describe background")]
    DescribeBackground,
    /// Describe the protagonist's reaction, when they are visible
    #[display("describe protagonist")]
    DescribeProtagonist,
}

/// Stage order for every page.
pub const PAGE_PIPELINE: [PageStage; 7] = [
    PageStage::DetectCharacters,
    PageStage::FilterProtagonist,
    PageStage::SeedSupporting,
    PageStage::RegisterCharacters,
    PageStage::DescribeReaction,
    PageStage::DescribeBackground,
    PageStage::DescribeProtagonist,
];

/// Scratch state carried between the stages of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PageWork {
    pub(crate) index: usize,
    pub(crate) paragraph: String,
    pub(crate) people: Vec<String>,
    pub(crate) animals: Vec<String>,
    pub(crate) candidates: Vec<String>,
    pub(crate) chosen: Option<String>,
}

impl PageWork {
    pub(crate) fn new(index: usize, paragraph: impl Into<String>) -> Self {
        Self {
            index,
            paragraph: paragraph.into(),
            ..Self::default()
        }
    }

    /// Whether the protagonist was detected by exact name.
    pub(crate) fn protagonist_visible(&self, protagonist: &str) -> bool {
        self.people.iter().any(|name| name == protagonist)
    }

    /// People then animals, minus blanks and anything containing the
    /// protagonist's name (case-insensitive), first occurrence kept.
    pub(crate) fn filter_candidates(&mut self, protagonist: &str) {
        let protagonist = protagonist.to_lowercase();
        let mut candidates: Vec<String> = Vec::new();
        for name in self.people.iter().chain(self.animals.iter()) {
            if name.is_empty()
                || name.to_lowercase().contains(&protagonist)
                || candidates.contains(name)
            {
                continue;
            }
            candidates.push(name.clone());
        }
        self.candidates = candidates;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(people: &[&str], animals: &[&str]) -> PageWork {
        let mut work = PageWork::new(0, "p");
        work.people = people.iter().map(|s| s.to_string()).collect();
        work.animals = animals.iter().map(|s| s.to_string()).collect();
        work
    }

    #[test]
    fn test_filter_drops_protagonist_variants() {
        let mut work = work(&["Gavin", "gavin's mom", "Mia"], &["Dog"]);
        work.filter_candidates("Gavin");
        assert_eq!(work.candidates, vec!["Mia", "Dog"]);
    }

    #[test]
    fn test_filter_deduplicates_in_order() {
        let mut work = work(&["Mia", "Owl"], &["Owl", "Cat", "Mia"]);
        work.filter_candidates("Gavin");
        assert_eq!(work.candidates, vec!["Mia", "Owl", "Cat"]);
    }

    #[test]
    fn test_protagonist_visibility_is_exact() {
        assert!(work(&["Gavin"], &[]).protagonist_visible("Gavin"));
        assert!(!work(&["gavin"], &[]).protagonist_visible("Gavin"));
        assert!(!work(&[], &["Gavin"]).protagonist_visible("Gavin"));
    }

    #[test]
    fn test_pipeline_order_is_fixed() {
        let mut sorted = PAGE_PIPELINE;
        sorted.sort();
        assert_eq!(sorted, PAGE_PIPELINE);
    }
}
