use lazy_regex::{regex_captures, regex_is_match};

// Sets won by side A and side B in one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetScore {
    pub a: u32,
    pub b: u32,
}

impl SetScore {
    pub fn is_well_formed(raw: &str) -> bool {
        regex_is_match!(r"^[0-9]+\s*-\s*[0-9]+$", raw.trim())
    }

    /// Parses a set score such as `"3-1"` or `" 3 - 2 "`.
    ///
    /// Returns `None` unless the whole string is two integers around a dash. Once the shape is right,
    /// a half that still can't be read as a number (it overflows) counts as 0 sets rather than
    /// dropping the match.
    pub fn parse(raw: &str) -> Option<SetScore> {
        if !Self::is_well_formed(raw) { return None; }

        let mut halves = raw.trim().split('-').map(|half| half.trim().parse::<u32>().unwrap_or(0));
        Some(SetScore {
            a: halves.next().unwrap_or(0),
            b: halves.next().unwrap_or(0),
        })
    }

    pub fn flipped(self) -> SetScore {
        SetScore { a: self.b, b: self.a }
    }
}

// Ranking points for (winner, loser). A 3-2 match gives the loser a point, every other decisive
// score is worth 3 to the winner and nothing to the loser.
pub fn points_from_set_score(winner_sets: u32, loser_sets: u32) -> (u32, u32) {
    match (winner_sets, loser_sets) {
        (3, 2) => (2, 1),
        _ => (3, 0),
    }
}

// Points scored by side A and side B, summed over the sets of one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RallyPoints {
    pub a: u32,
    pub b: u32,
}

impl RallyPoints {
    pub fn flipped(self) -> RallyPoints {
        RallyPoints { a: self.b, b: self.a }
    }
}

/// Sums a per-set score string such as `"25-20 | 25-22 | 20-25 | 25-18"`.
///
/// Sets may be separated by `|`, `,` or `;`. A segment without a readable `<int>-<int>` is skipped
/// and the others still count. Totals saturate at `u32::MAX`. Returns `None` when no segment could be
/// read.
pub fn parse_set_points(raw: &str) -> Option<RallyPoints> {
    let mut total: Option<RallyPoints> = None;

    for segment in raw.split(&['|', ',', ';'][..]).map(str::trim).filter(|s| !s.is_empty()) {
        let Some((_, a, b)) = regex_captures!(r"([0-9]+)\s*-\s*([0-9]+)", segment) else { continue };
        let (Ok(a), Ok(b)) = (a.parse::<u32>(), b.parse::<u32>()) else { continue };

        let sum = total.get_or_insert_with(RallyPoints::default);
        sum.a = sum.a.saturating_add(a);
        sum.b = sum.b.saturating_add(b);
    }

    total
}
