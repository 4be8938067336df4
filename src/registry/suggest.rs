//! # Name Suggestions
//!
//! "Did you mean" ranking for unresolved method names: bounded Levenshtein
//! distance, ascending, ties broken by name. Stateless; recomputed on every
//! failed lookup.

use std::collections::BTreeSet;

/// Most suggestions returned for one lookup.
pub const MAX_SUGGESTIONS: usize = 5;

/// Distances above this are not computed. Method names are short, so this
/// bounds work rather than relevance.
pub const MAX_EDIT_DISTANCE: usize = 25;

/// Rank `known` names by closeness to `requested`.
pub fn suggest<I, S>(requested: &str, known: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let ranked: BTreeSet<(usize, String)> = known
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            bounded_levenshtein(name, requested, MAX_EDIT_DISTANCE)
                .map(|distance| (distance, name.to_string()))
        })
        .collect();

    ranked
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, name)| name)
        .collect()
}

/// Levenshtein distance between `a` and `b`, or `None` if it exceeds
/// `threshold`. Compares by `char`.
pub fn bounded_levenshtein(a: &str, b: &str, threshold: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > threshold {
        return None;
    }
    if a.is_empty() {
        return Some(b.len());
    }
    if b.is_empty() {
        return Some(a.len());
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        let mut row_min = current[0];

        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current[j + 1] = substitution.min(deletion).min(insertion);
            row_min = row_min.min(current[j + 1]);
        }

        // Row minima never decrease, so the final distance can't come back
        // under the threshold once a whole row is above it.
        if row_min > threshold {
            return None;
        }
        std::mem::swap(&mut previous, &mut current);
    }

    let distance = previous[b.len()];
    (distance <= threshold).then_some(distance)
}
