use serde::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use serde_aux::field_attributes::{deserialize_default_from_null, deserialize_string_from_number};
use crate::error::Error;
use crate::score::SetScore;
use crate::util::non_empty;

// Reads the match feed at file_path. The feed is either a plain array of matches or an object keyed
// by match id, which is what a realtime database export looks like. Null holes are skipped, and so is
// any entry that doesn't look like a match at all: one broken record shouldn't hide the standings.
pub fn load_matches(file_path: &Path) -> Result<Vec<Match>, Error> {
    let data = fs::read_to_string(file_path).map_err(|source| Error::Io { path: file_path.to_owned(), source })?;
    let matches = parse_matches(&data).map_err(|source| Error::Json { path: file_path.to_owned(), source })?;

    log::info!("loaded {} matches from {}", matches.len(), file_path.display());
    Ok(matches)
}

pub fn parse_matches(data: &str) -> Result<Vec<Match>, serde_json::Error> {
    let entries = match serde_json::from_str::<MatchFeed>(data)? {
        MatchFeed::List(entries) => entries,
        MatchFeed::Keyed(entries) => keyed_in_feed_order(entries),
    };

    let mut matches = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        if entry.is_null() { continue; }

        match serde_json::from_value::<Match>(entry) {
            Ok(m) => matches.push(m),
            Err(e) => log::warn!("skipping match entry #{idx}: {e}"),
        }
    }

    Ok(matches)
}

// Entries of a keyed feed in id order. Push-style ids sort chronologically as strings; purely numeric
// ids ("1", "2", "10") sort by value and come before any other key.
fn keyed_in_feed_order(entries: BTreeMap<String, serde_json::Value>) -> Vec<serde_json::Value> {
    let mut entries: Vec<(Option<u64>, String, serde_json::Value)> = entries
        .into_iter()
        .map(|(key, value)| (key.parse::<u64>().ok(), key, value))
        .collect();
    entries.sort_by(|(a_num, a_key, _), (b_num, b_key, _)| match (a_num, b_num) {
        (Some(a), Some(b)) => a.cmp(b).then_with(|| a_key.cmp(b_key)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a_key.cmp(b_key),
    });
    entries.into_iter().map(|(_, _, value)| value).collect()
}

// Reads the live feed and refreshes the cached copy with it. When the feed is unreadable or empty,
// the cached copy is used instead. Having neither is the one terminal condition.
pub fn load_with_fallback(feed_path: &Path, cache_path: &Path) -> Result<Vec<Match>, Error> {
    match read_feed(feed_path) {
        Ok((raw, matches)) if !matches.is_empty() => {
            if let Err(e) = fs::write(cache_path, raw) {
                log::warn!("could not refresh cache {}: {e}", cache_path.display());
            }
            log::info!("loaded {} matches from {}", matches.len(), feed_path.display());
            return Ok(matches);
        }
        Ok(_) => log::warn!("{} holds no matches, using cache {}", feed_path.display(), cache_path.display()),
        Err(e) => log::warn!("{e}, using cache {}", cache_path.display()),
    }

    match read_feed(cache_path) {
        Ok((_, matches)) if !matches.is_empty() => {
            log::info!("loaded {} matches from cache {}", matches.len(), cache_path.display());
            Ok(matches)
        }
        Ok(_) => Err(Error::NoData),
        Err(e) => {
            log::warn!("{e}");
            Err(Error::NoData)
        }
    }
}

fn read_feed(path: &Path) -> Result<(String, Vec<Match>), Error> {
    let raw = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
    let matches = parse_matches(&raw).map_err(|source| Error::Json { path: path.to_owned(), source })?;
    Ok((raw, matches))
}

pub fn load_team_directory(file_path: &Path) -> Result<TeamDirectory, Error> {
    let data = fs::read_to_string(file_path).map_err(|source| Error::Io { path: file_path.to_owned(), source })?;
    let directory = parse_team_directory(&data).map_err(|source| Error::Json { path: file_path.to_owned(), source })?;

    log::info!("loaded {} registered teams from {}", directory.entries().len(), file_path.display());
    Ok(directory)
}

pub fn parse_team_directory(data: &str) -> Result<TeamDirectory, serde_json::Error> {
    serde_json::from_str(data)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MatchFeed {
    List(Vec<serde_json::Value>),
    Keyed(BTreeMap<String, serde_json::Value>),
}

#[derive(Serialize,Deserialize,Debug,Clone,Default,PartialEq)]
pub struct Match {
    #[serde(rename = "equipeA", deserialize_with = "deserialize_string_from_number")]
    pub team_a: String,
    #[serde(rename = "equipeB", deserialize_with = "deserialize_string_from_number")]
    pub team_b: String,
    #[serde(rename = "categorie", default)]
    pub category: Option<String>,
    #[serde(rename = "poule", default)]
    pub pool: Option<String>,
    #[serde(rename = "termine", default, deserialize_with = "deserialize_default_from_null")]
    pub finished: bool,
    // Sets won by each side, "3-1"
    #[serde(rename = "resultat", default)]
    pub result: Option<String>,
    // Points per set, "25-20 | 25-22 | 20-25 | 25-18"
    #[serde(default)]
    pub score: Option<String>,
    #[serde(rename = "logoA", default)]
    pub logo_a: Option<String>,
    #[serde(rename = "logoB", default)]
    pub logo_b: Option<String>,
}

impl Match {
    // Finished and carrying a well-formed set score. Anything else hasn't been played yet, or was
    // entered inconsistently, and stays out of the standings.
    pub fn is_completed(&self) -> bool {
        self.finished && self.result.as_deref().is_some_and(SetScore::is_well_formed)
    }

    pub fn category(&self) -> Option<&str> {
        non_empty(self.category.as_deref())
    }

    pub fn explicit_pool(&self) -> Option<&str> {
        non_empty(self.pool.as_deref())
    }

    pub fn logo_of(&self, team: &str) -> Option<&str> {
        if team == self.team_a {
            non_empty(self.logo_a.as_deref())
        } else if team == self.team_b {
            non_empty(self.logo_b.as_deref())
        } else {
            None
        }
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,Default,PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TeamMeta {
    #[serde(rename = "poule", default)]
    pub pool: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

// Registered teams, keyed by the exact identifier used in the match feed. Either one table for the
// whole competition or one per category ("Homme", "Femme", ...).
#[derive(Serialize,Debug,Clone,PartialEq)]
#[serde(untagged)]
pub enum TeamDirectory {
    Flat(BTreeMap<String, TeamMeta>),
    ByCategory(BTreeMap<String, BTreeMap<String, TeamMeta>>),
}

// A table is per category when every value is an object of objects. TeamMeta fields are strings, so
// the only flat table that also fits is one whose entries are all `{}`; it is read as categories
// that nobody has registered for yet.
impl<'de> Deserialize<'de> for TeamDirectory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let table = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let partitioned = !table.is_empty()
            && table.values().all(|v| v.as_object().is_some_and(|teams| teams.values().all(serde_json::Value::is_object)));

        let value = serde_json::Value::Object(table.into_iter().collect());
        if partitioned {
            serde_json::from_value(value).map(TeamDirectory::ByCategory).map_err(de::Error::custom)
        } else {
            serde_json::from_value(value).map(TeamDirectory::Flat).map_err(de::Error::custom)
        }
    }
}

impl Default for TeamDirectory {
    fn default() -> Self {
        TeamDirectory::Flat(BTreeMap::new())
    }
}

impl TeamDirectory {
    // In a per-category table, a category naming a partition restricts the search to it.
    // Without one, partitions are searched in key order.
    pub fn lookup(&self, category: Option<&str>, team: &str) -> Option<&TeamMeta> {
        match self {
            TeamDirectory::Flat(teams) => teams.get(team),
            TeamDirectory::ByCategory(categories) => match category.and_then(|c| categories.get(c)) {
                Some(teams) => teams.get(team),
                None => categories.values().find_map(|teams| teams.get(team)),
            },
        }
    }

    pub fn pool_of(&self, category: Option<&str>, team: &str) -> Option<&str> {
        self.lookup(category, team).and_then(|meta| non_empty(meta.pool.as_deref()))
    }

    // Every registration, in key order. A team registered in two categories shows up twice.
    pub fn entries(&self) -> Vec<(&str, &TeamMeta)> {
        match self {
            TeamDirectory::Flat(teams) => teams.iter().map(|(id, meta)| (id.as_str(), meta)).collect(),
            TeamDirectory::ByCategory(categories) => categories
                .values()
                .flat_map(|teams| teams.iter().map(|(id, meta)| (id.as_str(), meta)))
                .collect(),
        }
    }

    // The part of the directory that applies to one category. A flat table applies to all of them.
    pub fn slice(&self, category: &str) -> TeamDirectory {
        match self {
            TeamDirectory::Flat(_) => self.clone(),
            TeamDirectory::ByCategory(categories) => {
                TeamDirectory::Flat(categories.get(category).cloned().unwrap_or_default())
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            TeamDirectory::Flat(teams) => teams.is_empty(),
            TeamDirectory::ByCategory(categories) => categories.values().all(BTreeMap::is_empty),
        }
    }
}
