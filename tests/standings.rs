use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use volley_standings::*;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn scenario() -> (Vec<Match>, TeamDirectory) {
    let matches = parse_matches(&read_fixture("poule_a.json")).expect("matches should parse");
    let directory = parse_team_directory(&read_fixture("teams.json")).expect("teams should parse");
    (matches, directory)
}

fn order(rows: &[TeamRow]) -> Vec<&str> {
    rows.iter().map(|r| r.team.as_str()).collect()
}

#[test]
fn poule_a_scenario() {
    let (matches, directory) = scenario();
    assert_eq!(matches.len(), 4);

    let standings = compute_standings(&matches, &directory, &RankingContext::default());
    assert_eq!(standings.len(), 1);
    let rows = &standings["Poule A"];
    assert_eq!(order(rows), ["A", "B", "C", "D"]);

    let stats: Vec<(u32, u32, u32, u32)> = rows.iter().map(|r| (r.played, r.won, r.lost, r.pts)).collect();
    assert_eq!(stats, [(2, 1, 1, 4), (2, 1, 1, 3), (2, 1, 1, 2), (0, 0, 0, 0)]);

    let sets: Vec<(u32, u32)> = rows.iter().map(|r| (r.sets_for, r.sets_against)).collect();
    assert_eq!(sets, [(5, 4), (4, 3), (3, 5), (0, 0)]);

    // Only the first match carries per-set points
    assert_eq!((rows[0].points_for, rows[0].points_against), (95, 85));
    assert_eq!((rows[1].points_for, rows[1].points_against), (85, 95));
    assert_eq!((rows[2].points_for, rows[2].points_against), (0, 0));

    assert_eq!(rows[0].display_name, "Équipe A");
    assert_eq!(rows[0].logo.as_deref(), Some("./public/images/a.png"));
    assert_eq!(rows[3].display_name, "Équipe D");
    assert_eq!(rows[3].logo, None);
}

#[test]
fn poule_a_scenario_by_category() {
    let (matches, directory) = scenario();
    let ranking_context = RankingContext::default();
    let categories = discover_categories(&matches, &ranking_context);
    assert_eq!(categories, ["Femme"]);

    let blocks = compute_by_category(&matches, &directory, &ranking_context, &categories);
    assert_eq!(blocks.len(), 1);
    assert_eq!(order(&blocks[0].pools["Poule A"]), ["A", "B", "C", "D"]);

    // A category nobody registered for or played in is empty
    let blocks = compute_by_category(&matches, &directory, &ranking_context, &["Homme".to_string()]);
    assert!(blocks[0].pools.is_empty());
}

#[test]
fn zero_match_teams_rank_below_scorers() {
    let matches = vec![
        Match { team_a: "X".into(), team_b: "Y".into(), finished: true, result: Some("3-2".into()), ..Default::default() },
    ];
    let directory = parse_team_directory(r#"{
        "Z": {"poule": "Poule unique"},
        "W": {},
        "X": {}
    }"#).unwrap();

    let standings = compute_standings(&matches, &directory, &RankingContext::default());
    let rows = &standings["Poule unique"];
    // X and Y both scored, the registered newcomers follow in registration order
    assert_eq!(order(rows), ["X", "Y", "W", "Z"]);
    assert!(rows[2..].iter().all(|r| *r == TeamRow::new(&r.team, &r.team, None)));
}

#[test]
fn head_to_head_decides_level_teams() {
    let result = |a: &str, b: &str, r: &str| Match {
        team_a: a.into(),
        team_b: b.into(),
        finished: true,
        result: Some(r.into()),
        ..Default::default()
    };
    // Y shows up first, so only the mutual result can put X ahead
    let matches = vec![
        result("Y", "Q", "3-1"),
        result("R", "X", "3-1"),
        result("X", "Y", "3-1"),
    ];

    let standings = compute_standings(&matches, &TeamDirectory::default(), &RankingContext::default());
    let rows = &standings["Poule unique"];
    assert_eq!(order(rows), ["R", "X", "Y", "Q"]);

    for r in &rows[1..3] {
        assert_eq!((r.played, r.pts, r.won, r.sets_for, r.sets_against), (2, 3, 1, 4, 4));
    }
}

#[test]
fn cyclic_head_to_head_does_not_panic() {
    let result = |a: &str, b: &str| Match {
        team_a: a.into(),
        team_b: b.into(),
        finished: true,
        result: Some("3-0".into()),
        ..Default::default()
    };
    let matches = vec![result("X", "Y"), result("Y", "Z"), result("Z", "X")];
    let ranking_context = RankingContext::default();

    let first = compute_standings(&matches, &TeamDirectory::default(), &ranking_context);
    let second = compute_standings(&matches, &TeamDirectory::default(), &ranking_context);
    assert_eq!(first, second);
    assert_eq!(first["Poule unique"].len(), 3);
}

#[test]
fn overflowing_set_totals_saturate() {
    let result = |a: &str, b: &str, r: &str| Match {
        team_a: a.into(),
        team_b: b.into(),
        finished: true,
        result: Some(r.into()),
        ..Default::default()
    };
    let matches = vec![result("A", "B", "4294967295-0"), result("A", "C", "3-0")];

    let standings = compute_standings(&matches, &TeamDirectory::default(), &RankingContext::default());
    let rows = &standings["Poule unique"];
    assert_eq!(order(rows), ["A", "C", "B"]);
    assert_eq!((rows[0].played, rows[0].won, rows[0].pts), (2, 2, 6));
    assert_eq!((rows[0].sets_for, rows[0].sets_against), (u32::MAX, 0));
    assert_eq!(parse_set_points("4294967295-0 | 1-0"), Some(RallyPoints { a: u32::MAX, b: 0 }));
}

#[test]
fn directory_with_only_empty_categories_adds_no_teams() {
    let directory = parse_team_directory(r#"{"Femme": {}, "Homme": {}}"#).unwrap();
    let ranking_context = RankingContext::default();

    assert!(compute_standings(&[], &directory, &ranking_context).is_empty());
    let blocks = compute_by_category(&[], &directory, &ranking_context, &["Femme".to_string(), "Homme".to_string()]);
    assert!(blocks.iter().all(|b| b.pools.is_empty()));
}

const TEAMS: [&str; 6] = ["ASI", "AMVB", "ECVB", "EVBI", "GNVB", "MAMI"];
const RESULTS: [&str; 6] = ["3-0", "3-1", "3-2", "0-3", "1-3", "2-3"];

fn random_season(rng: &mut StdRng, count: usize) -> Vec<Match> {
    (0..count)
        .map(|_| {
            let a = rng.random_range(0..TEAMS.len());
            let b = (a + rng.random_range(1..TEAMS.len())) % TEAMS.len();
            let score = rng.random_bool(0.5).then(|| {
                let sets: Vec<String> = (0..rng.random_range(3..=5))
                    .map(|_| format!("{}-{}", rng.random_range(10..30), rng.random_range(10..30)))
                    .collect();
                sets.join(" | ")
            });

            Match {
                team_a: TEAMS[a].to_string(),
                team_b: TEAMS[b].to_string(),
                pool: Some(if a % 2 == 0 { "Poule A" } else { "Poule B" }.to_string()),
                finished: rng.random_bool(0.9),
                result: Some(RESULTS[rng.random_range(0..RESULTS.len())].to_string()),
                score,
                ..Default::default()
            }
        })
        .collect()
}

#[test]
fn random_seasons_hold_invariants() {
    let directory = TeamDirectory::default();
    let ranking_context = RankingContext::default();

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let matches = random_season(&mut rng, 40);
        let completed = filter_completed(&matches);

        let mut builder = StandingsBuilder::new(&directory, &ranking_context);
        for m in &completed {
            builder.accumulate(m);
        }
        builder.sort_pools();

        for pool in ["Poule A", "Poule B"] {
            let Some(rows) = builder.rows(pool) else { continue };
            let head_to_head = builder.head_to_head(pool).unwrap();
            let pool_matches = completed.iter().filter(|m| m.pool.as_deref() == Some(pool)).count() as u32;

            for r in rows {
                assert_eq!(r.won + r.lost, r.played, "seed {seed}: {}", r.team);
            }

            // Every decisive match hands out 3 points in total, 3-0 or 2-1
            assert_eq!(rows.iter().map(|r| r.pts).sum::<u32>(), 3 * pool_matches, "seed {seed}");
            assert_eq!(rows.iter().map(|r| r.played).sum::<u32>(), 2 * pool_matches, "seed {seed}");

            let sets_for: u32 = rows.iter().map(|r| r.sets_for).sum();
            let sets_against: u32 = rows.iter().map(|r| r.sets_against).sum();
            assert_eq!(sets_for, sets_against, "seed {seed}");
            let points_for: u32 = rows.iter().map(|r| r.points_for).sum();
            let points_against: u32 = rows.iter().map(|r| r.points_against).sum();
            assert_eq!(points_for, points_against, "seed {seed}");

            for x in rows {
                for y in rows {
                    match (head_to_head.get(&x.team, &y.team), head_to_head.get(&y.team, &x.team)) {
                        (Some(xy), Some(yx)) => {
                            assert_eq!((xy.sets_for, xy.sets_against), (yx.sets_against, yx.sets_for));
                            assert_eq!((xy.points_for, xy.points_against), (yx.points_against, yx.points_for));
                        }
                        (None, None) => {}
                        _ => panic!("seed {seed}: one-sided head-to-head between {} and {}", x.team, y.team),
                    }
                }
            }

            for pair in rows.windows(2) {
                assert_ne!(compare_rows(&pair[0], &pair[1], head_to_head), std::cmp::Ordering::Greater, "seed {seed}");
            }
        }
    }
}

#[test]
fn repeated_runs_are_identical() {
    let mut rng = StdRng::seed_from_u64(7);
    let matches = random_season(&mut rng, 60);
    let directory = TeamDirectory::default();
    let ranking_context = RankingContext::default();

    let first = compute_standings(&matches, &directory, &ranking_context);
    for _ in 0..5 {
        assert_eq!(compute_standings(&matches, &directory, &ranking_context), first);
    }
}

#[test]
fn totals_do_not_depend_on_match_order() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut matches = random_season(&mut rng, 50);
    let directory = TeamDirectory::default();
    let ranking_context = RankingContext::default();

    let totals = |standings: &Standings| -> HashMap<(String, String), TeamRow> {
        standings
            .iter()
            .flat_map(|(pool, rows)| rows.iter().map(move |r| ((pool.clone(), r.team.clone()), r.clone())))
            .collect()
    };

    let before = totals(&compute_standings(&matches, &directory, &ranking_context));
    matches.shuffle(&mut rng);
    let after = totals(&compute_standings(&matches, &directory, &ranking_context));
    assert_eq!(before, after);
}
