use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use crate::data_loader::{Match, TeamDirectory, TeamMeta};
use crate::ranking::{sort_pool, HeadToHead};
use crate::ranking_context::RankingContext;
use crate::score::{parse_set_points, SetScore};
use crate::util::*;

/// Ranked rows per pool, keyed by pool name.
pub type Standings = BTreeMap<String, Vec<TeamRow>>;

// One line of a pool table. Serialized with the column names the front end renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamRow {
    pub team: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub logo: Option<String>,

    #[serde(rename = "J")]
    pub played: u32,
    #[serde(rename = "G")]
    pub won: u32,
    #[serde(rename = "P")]
    pub lost: u32,
    #[serde(rename = "Pts")]
    pub pts: u32,

    #[serde(rename = "setsPlus")]
    pub sets_for: u32,
    #[serde(rename = "setsMoins")]
    pub sets_against: u32,
    #[serde(rename = "ptsPlus")]
    pub points_for: u32,
    #[serde(rename = "ptsMoins")]
    pub points_against: u32,
}

impl TeamRow {
    pub fn new(team: &str, display_name: &str, logo: Option<&str>) -> Self {
        Self {
            team: team.to_owned(),
            display_name: display_name.to_owned(),
            logo: logo.map(str::to_owned),
            ..Default::default()
        }
    }

    // Name and logo come from the registration when there is one, otherwise the raw id and
    // whatever logo the match feed carried.
    fn registered(team: &str, meta: Option<&TeamMeta>, fallback_logo: Option<&str>) -> Self {
        let display_name = meta.and_then(|m| non_empty(m.display_name.as_deref())).unwrap_or(team);
        let logo = meta.and_then(|m| non_empty(m.logo.as_deref())).or(fallback_logo);
        Self::new(team, display_name, logo)
    }

    pub fn sets_ratio(&self) -> f64 { ratio(self.sets_for, self.sets_against) }
    pub fn sets_diff(&self) -> i64 { self.sets_for as i64 - self.sets_against as i64 }
    pub fn points_ratio(&self) -> f64 { ratio(self.points_for, self.points_against) }
    pub fn points_diff(&self) -> i64 { self.points_for as i64 - self.points_against as i64 }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryStandings {
    pub category: Option<String>,
    pub pools: Standings,
}

// Rows are kept in the order teams first showed up, so ties stay put across runs.
#[derive(Debug, Default)]
struct PoolTable {
    rows: Vec<TeamRow>,
    index: HashMap<String, usize>,
    head_to_head: HeadToHead,
}

impl PoolTable {
    fn contains(&self, team: &str) -> bool {
        self.index.contains_key(team)
    }

    fn ensure<F>(&mut self, team: &str, fallback_logo: Option<&str>, make_row: F) -> usize where
        F: FnOnce() -> TeamRow {
        if let Some(&idx) = self.index.get(team) {
            let row = &mut self.rows[idx];
            if row.logo.is_none() {
                row.logo = fallback_logo.map(str::to_owned);
            }
            return idx;
        }

        self.rows.push(make_row());
        self.index.insert(team.to_owned(), self.rows.len() - 1);
        self.rows.len() - 1
    }

    fn sort(&mut self) {
        sort_pool(&mut self.rows, &self.head_to_head);
        self.index = self.rows.iter().enumerate().map(|(idx, row)| (row.team.clone(), idx)).collect();
    }
}

// Pool of a match: its own pool field, else team A's registered pool, else team B's, else the
// fallback pool.
pub fn resolve_pool(m: &Match, directory: &TeamDirectory, ranking_context: &RankingContext) -> String {
    let category = m.category();

    m.explicit_pool()
        .or_else(|| directory.pool_of(category, &m.team_a))
        .or_else(|| directory.pool_of(category, &m.team_b))
        .unwrap_or(ranking_context.fallback_pool.as_str())
        .to_owned()
}

pub fn filter_completed(matches: &[Match]) -> Vec<&Match> {
    matches.iter().filter(|m| m.is_completed()).collect()
}

// Working state of one standings computation. Built fresh for every call and consumed by finish().
pub struct StandingsBuilder<'a> {
    directory: &'a TeamDirectory,
    ranking_context: &'a RankingContext,
    pools: BTreeMap<String, PoolTable>,
}

impl<'a> StandingsBuilder<'a> {
    pub fn new(directory: &'a TeamDirectory, ranking_context: &'a RankingContext) -> Self {
        Self {
            directory,
            ranking_context,
            pools: BTreeMap::new(),
        }
    }

    // Folds one completed match into its pool. A match without a readable set score is ignored.
    pub fn accumulate(&mut self, m: &Match) {
        let Some(sets) = m.result.as_deref().and_then(SetScore::parse) else {
            log::debug!("ignoring {} vs {}: no usable result", m.team_a, m.team_b);
            return;
        };
        let points = m.score.as_deref().and_then(parse_set_points);

        let directory = self.directory;
        let category = m.category();
        let pool = resolve_pool(m, directory, self.ranking_context);
        let table = self.pools.entry(pool).or_default();

        let mut ensure = |team: &str| {
            let logo = m.logo_of(team);
            table.ensure(team, logo, || {
                let meta = directory.lookup(category, team);
                if meta.is_none() {
                    log::debug!("{team} isn't registered, using its id as display name");
                }
                TeamRow::registered(team, meta, logo)
            })
        };
        let a = ensure(&m.team_a);
        let b = ensure(&m.team_b);

        table.rows[a].record(sets, points);
        table.rows[b].record(sets.flipped(), points.map(|p| p.flipped()));
        table.head_to_head.record(&m.team_a, &m.team_b, sets, points);
    }

    pub fn sort_pools(&mut self) {
        for table in self.pools.values_mut() {
            table.sort();
        }
    }

    // Gives every registered team a row in its pool, even before it has played, and re-sorts the
    // pools that got new rows. Returns the number of rows added; a second call adds none.
    pub fn complete_roster(&mut self) -> usize {
        let directory = self.directory;
        let ranking_context = self.ranking_context;
        let mut touched = BTreeSet::new();
        let mut added = 0;

        for (team, meta) in directory.entries() {
            // Registration pool only, not resolve_pool: a team that played under a match's explicit
            // `poule` still gets a zero row in the pool it registered for. This is intended.
            let pool = non_empty(meta.pool.as_deref()).unwrap_or(ranking_context.fallback_pool.as_str());
            let table = self.pools.entry(pool.to_owned()).or_default();
            if table.contains(team) { continue; }

            table.ensure(team, None, || TeamRow::registered(team, Some(meta), None));
            touched.insert(pool.to_owned());
            added += 1;
        }

        for pool in &touched {
            if let Some(table) = self.pools.get_mut(pool) {
                table.sort();
            }
        }

        added
    }

    pub fn head_to_head(&self, pool: &str) -> Option<&HeadToHead> {
        self.pools.get(pool).map(|table| &table.head_to_head)
    }

    pub fn rows(&self, pool: &str) -> Option<&[TeamRow]> {
        self.pools.get(pool).map(|table| table.rows.as_slice())
    }

    pub fn finish(self) -> Standings {
        self.pools.into_iter().map(|(pool, table)| (pool, table.rows)).collect()
    }
}

fn run<'m, I>(matches: I, directory: &TeamDirectory, ranking_context: &RankingContext) -> Standings where
    I: IntoIterator<Item = &'m Match> {
    let mut builder = StandingsBuilder::new(directory, ranking_context);

    let mut skipped = 0;
    for m in matches {
        if m.is_completed() {
            builder.accumulate(m);
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        log::debug!("{skipped} matches not finished or without a valid result");
    }

    builder.sort_pools();
    builder.complete_roster();
    builder.finish()
}

/// Standings of the whole competition, every category mixed.
pub fn compute_standings(matches: &[Match], directory: &TeamDirectory, ranking_context: &RankingContext) -> Standings {
    run(matches, directory, ranking_context)
}

/// One standings run per category, each using only that category's matches and registrations.
/// A match without a category belongs to `ranking_context.unknown_category`.
pub fn compute_by_category(matches: &[Match], directory: &TeamDirectory, ranking_context: &RankingContext, categories: &[String]) -> Vec<CategoryStandings> {
    categories
        .iter()
        .map(|category| {
            let slice = directory.slice(category);
            let in_category = matches.iter().filter(|m| ranking_context.category_of(m.category()) == category.as_str());

            CategoryStandings {
                category: Some(category.clone()),
                pools: run(in_category, &slice, ranking_context),
            }
        })
        .collect()
}

// Splits by category when the context lists some, otherwise one block for everything.
pub fn compute(matches: &[Match], directory: &TeamDirectory, ranking_context: &RankingContext) -> Vec<CategoryStandings> {
    match &ranking_context.categories {
        Some(categories) => compute_by_category(matches, directory, ranking_context, categories),
        None => vec![CategoryStandings {
            category: None,
            pools: compute_standings(matches, directory, ranking_context),
        }],
    }
}

// Categories in the order they first appear in the feed, finished or not.
pub fn discover_categories(matches: &[Match], ranking_context: &RankingContext) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for m in matches {
        let category = ranking_context.category_of(m.category());
        if !categories.iter().any(|c| c == category) {
            categories.push(category.to_owned());
        }
    }
    categories
}
