use std::cmp::Ordering;

// for / against, with an unbeaten record counting as infinitely good and an empty one as 0
pub fn ratio(value_for: u32, value_against: u32) -> f64 {
    if value_against == 0 {
        if value_for > 0 { f64::INFINITY } else { 0.0 }
    } else {
        value_for as f64 / value_against as f64
    }
}

pub fn cmp_ratio(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

pub fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

// Stable sort that only ever swaps neighbours. The standings comparator isn't transitive once
// head-to-head results go round in a circle, and slice::sort_by is allowed to panic on that.
// Pools are small enough for the quadratic worst case not to matter.
pub fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F) where
    F: FnMut(&T, &T) -> Ordering {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}
