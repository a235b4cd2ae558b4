use std::fs;
use std::io::{self, Write};
use std::path::Path;
use serde::Serialize;
use crate::error::Error;
use crate::standings::{CategoryStandings, TeamRow};

pub fn output_report(standings: &[CategoryStandings]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, standings)
}

pub fn write_report<W: Write>(out: &mut W, standings: &[CategoryStandings]) -> io::Result<()> {
    for block in standings {
        if let Some(category) = &block.category {
            writeln!(out, "Classement — {category}")?;
            writeln!(out)?;
        }

        for (pool, rows) in &block.pools {
            writeln!(out, "{pool}")?;
            writeln!(out, "|  #  | {0:25} | {1:>3} | {2:>3} | {3:>3} | {4:>4} | {5:>7} | {6:>9} |",
                "Équipe", "J", "G", "P", "Pts", "Sets", "Points",
            )?;

            for (i, t) in rows.iter().enumerate() {
                writeln!(out, "|{0:3}. | {1:25} | {2:3} | {3:3} | {4:3} | {5:4} | {6:>7} | {7:>9} |",
                    i + 1,
                    t.display_name,
                    t.played,
                    t.won,
                    t.lost,
                    t.pts,
                    format!("{}-{}", t.sets_for, t.sets_against),
                    format!("{}-{}", t.points_for, t.points_against),
                )?;
            }
            writeln!(out)?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct CsvRow<'a> {
    category: &'a str,
    pool: &'a str,
    rank: usize,
    team: &'a str,
    display_name: &'a str,
    logo: &'a str,
    played: u32,
    won: u32,
    lost: u32,
    pts: u32,
    sets_for: u32,
    sets_against: u32,
    points_for: u32,
    points_against: u32,
}

impl<'a> CsvRow<'a> {
    fn new(category: &'a str, pool: &'a str, rank: usize, t: &'a TeamRow) -> Self {
        Self {
            category,
            pool,
            rank,
            team: &t.team,
            display_name: &t.display_name,
            logo: t.logo.as_deref().unwrap_or(""),
            played: t.played,
            won: t.won,
            lost: t.lost,
            pts: t.pts,
            sets_for: t.sets_for,
            sets_against: t.sets_against,
            points_for: t.points_for,
            points_against: t.points_against,
        }
    }
}

// One record per team and pool, ranks starting at 1.
pub fn write_csv_to<W: Write>(writer: W, standings: &[CategoryStandings]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    for block in standings {
        let category = block.category.as_deref().unwrap_or("");
        for (pool, rows) in &block.pools {
            for (i, t) in rows.iter().enumerate() {
                wtr.serialize(CsvRow::new(category, pool, i + 1, t))?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_csv(file_path: &Path, standings: &[CategoryStandings]) -> Result<(), Error> {
    let file = fs::File::create(file_path).map_err(|source| Error::Write { path: file_path.to_owned(), source })?;
    write_csv_to(file, standings)?;

    log::info!("wrote standings to {}", file_path.display());
    Ok(())
}

pub fn write_json(file_path: &Path, standings: &[CategoryStandings]) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(standings)?;
    fs::write(file_path, json).map_err(|source| Error::Write { path: file_path.to_owned(), source })?;

    log::info!("wrote standings to {}", file_path.display());
    Ok(())
}
