// Knobs for a standings run. Callers take the default and overwrite the fields they care about,
// the CLI maps its flags straight onto these.
#[derive(Debug, Clone)]
pub struct RankingContext {
    pub fallback_pool: String,      // Pool for teams nobody assigned anywhere
    pub unknown_category: String,   // Category of a match that doesn't carry one

    // When set, standings are computed once per listed category
    pub categories: Option<Vec<String>>,
}

impl Default for RankingContext {
    fn default() -> Self {
        Self {
            fallback_pool: "Poule unique".to_string(),
            unknown_category: "Inconnue".to_string(),

            categories: None,
        }
    }
}

impl RankingContext {
    pub fn category_of<'a>(&'a self, category: Option<&'a str>) -> &'a str {
        match category {
            Some(c) if !c.trim().is_empty() => c,
            _ => &self.unknown_category,
        }
    }
}
