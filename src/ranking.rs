use std::cmp::Ordering;
use std::collections::HashMap;
use crate::score::{points_from_set_score, RallyPoints, SetScore};
use crate::standings::TeamRow;
use crate::util::*;

// One team's record against one opponent, counting only the matches between the two of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadToHeadCell {
    pub wins: u32,
    pub sets_for: u32,
    pub sets_against: u32,
    pub points_for: u32,
    pub points_against: u32,
}

impl HeadToHeadCell {
    pub fn sets_ratio(&self) -> f64 { ratio(self.sets_for, self.sets_against) }
    pub fn points_ratio(&self) -> f64 { ratio(self.points_for, self.points_against) }
}

// Mutual results inside one pool. The cell for (x, y) mirrors the one for (y, x); a missing cell
// means the two teams haven't met.
#[derive(Debug, Clone, Default)]
pub struct HeadToHead {
    cells: HashMap<String, HashMap<String, HeadToHeadCell>>,
}

impl HeadToHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, team: &str, opponent: &str) -> Option<&HeadToHeadCell> {
        self.cells.get(team)?.get(opponent)
    }

    pub fn record(&mut self, team_a: &str, team_b: &str, sets: SetScore, points: Option<RallyPoints>) {
        let winner = match sets.a.cmp(&sets.b) {
            Ordering::Greater => Some(team_a),
            Ordering::Less => Some(team_b),
            Ordering::Equal => None,
        };

        for (team, opponent, sets, points) in [
            (team_a, team_b, sets, points),
            (team_b, team_a, sets.flipped(), points.map(RallyPoints::flipped)),
        ] {
            let cell = self.cell_mut(team, opponent);
            if winner == Some(team) { cell.wins = cell.wins.saturating_add(1); }
            cell.sets_for = cell.sets_for.saturating_add(sets.a);
            cell.sets_against = cell.sets_against.saturating_add(sets.b);
            if let Some(points) = points {
                cell.points_for = cell.points_for.saturating_add(points.a);
                cell.points_against = cell.points_against.saturating_add(points.b);
            }
        }
    }

    fn cell_mut(&mut self, team: &str, opponent: &str) -> &mut HeadToHeadCell {
        self.cells
            .entry(team.to_owned())
            .or_default()
            .entry(opponent.to_owned())
            .or_default()
    }
}

impl TeamRow {
    // Folds one match into the row, seen from this team's side. Counters saturate at u32::MAX.
    pub fn record(&mut self, sets: SetScore, points: Option<RallyPoints>) {
        self.played = self.played.saturating_add(1);

        match sets.a.cmp(&sets.b) {
            Ordering::Greater => {
                let (win_pts, _) = points_from_set_score(sets.a, sets.b);
                self.won = self.won.saturating_add(1);
                self.pts = self.pts.saturating_add(win_pts);
            }
            Ordering::Less => {
                let (_, lose_pts) = points_from_set_score(sets.b, sets.a);
                self.lost = self.lost.saturating_add(1);
                self.pts = self.pts.saturating_add(lose_pts);
            }
            // Can't happen in a real match, so it's worth nothing to either side
            Ordering::Equal => {}
        }

        self.sets_for = self.sets_for.saturating_add(sets.a);
        self.sets_against = self.sets_against.saturating_add(sets.b);

        if let Some(points) = points {
            self.points_for = self.points_for.saturating_add(points.a);
            self.points_against = self.points_against.saturating_add(points.b);
        }
    }
}

/// Standings order of two rows of the same pool: `Less` means `a` ranks above `b`.
///
/// Criteria, first difference wins:
/// ranking points, wins, set ratio, set difference, point ratio, point difference,
/// head-to-head (wins, then set ratio, then point ratio, skipped if the teams never met),
/// and finally fewer matches played.
pub fn compare_rows(a: &TeamRow, b: &TeamRow, head_to_head: &HeadToHead) -> Ordering {
    b.pts.cmp(&a.pts)
        .then_with(|| b.won.cmp(&a.won))
        .then_with(|| cmp_ratio(b.sets_ratio(), a.sets_ratio()))
        .then_with(|| b.sets_diff().cmp(&a.sets_diff()))
        .then_with(|| cmp_ratio(b.points_ratio(), a.points_ratio()))
        .then_with(|| b.points_diff().cmp(&a.points_diff()))
        .then_with(|| compare_head_to_head(a, b, head_to_head))
        .then_with(|| a.played.cmp(&b.played))
}

fn compare_head_to_head(a: &TeamRow, b: &TeamRow, head_to_head: &HeadToHead) -> Ordering {
    let (Some(a_vs_b), Some(b_vs_a)) = (head_to_head.get(&a.team, &b.team), head_to_head.get(&b.team, &a.team)) else {
        return Ordering::Equal;
    };

    b_vs_a.wins.cmp(&a_vs_b.wins)
        .then_with(|| cmp_ratio(b_vs_a.sets_ratio(), a_vs_b.sets_ratio()))
        .then_with(|| cmp_ratio(b_vs_a.points_ratio(), a_vs_b.points_ratio()))
}

pub fn sort_pool(rows: &mut [TeamRow], head_to_head: &HeadToHead) {
    insertion_sort_by(rows, |a, b| compare_rows(a, b, head_to_head));
}
