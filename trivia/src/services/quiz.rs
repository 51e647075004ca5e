//! Quiz round: pick one not-yet-asked question at random.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

/// `None` when every candidate was already asked.
pub fn next_question<'a, T, R>(
    candidates: &'a [T],
    previous: &HashSet<i32>,
    id_of: impl Fn(&T) -> i32,
    rng: &mut R,
) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    let remaining: Vec<&T> = candidates
        .iter()
        .filter(|q| !previous.contains(&id_of(*q)))
        .collect();

    remaining.choose(rng).copied()
}
