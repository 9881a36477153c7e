//! Trigram similarity with the same definition as PostgreSQL's `pg_trgm`.
//!
//! Words are maximal runs of alphanumeric characters, lowercased and padded
//! with two blanks in front and one behind. Similarity is the number of
//! distinct shared trigrams divided by the number of distinct trigrams in
//! either string.

use std::collections::BTreeSet;

type Trigram = [char; 3];

fn trigrams(text: &str) -> BTreeSet<Trigram> {
    let mut set = BTreeSet::new();

    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = [' ', ' ']
            .into_iter()
            .chain(word.chars().flat_map(char::to_lowercase))
            .chain([' '])
            .collect();

        for window in padded.windows(3) {
            set.insert([window[0], window[1], window[2]]);
        }
    }

    set
}

/// `similarity(a, b)` as computed by `pg_trgm`, in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f32 {
    let a = trigrams(a);
    let b = trigrams(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let shared = a.intersection(&b).count();
    let total = a.len() + b.len() - shared;
    shared as f32 / total as f32
}
