//! Picking the next quiz question for a client-held session.
//!
//! The server keeps no quiz state: every request carries the ids already shown,
//! and the next question is drawn uniformly from the candidates not among them.

use std::collections::HashSet;

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::db::Question;

/// Category id meaning "draw from every question".
pub const ALL_CATEGORIES: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidatePool {
    All,
    Category(i64),
}

impl From<i64> for CandidatePool {
    fn from(id: i64) -> Self {
        if id == ALL_CATEGORIES {
            CandidatePool::All
        } else {
            CandidatePool::Category(id)
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Selection<'a> {
    Unseen(&'a Question),
    /// Every candidate was already shown, or there were no candidates at all.
    Exhausted,
}

/// Draws a question from `candidates` whose id is not in `previous`, using a
/// fresh thread-local generator.
pub fn select_unseen<'a>(candidates: &'a [Question], previous: &HashSet<i64>) -> Selection<'a> {
    select_unseen_with(candidates, previous, &mut rand::rng())
}

pub fn select_unseen_with<'a, R>(
    candidates: &'a [Question],
    previous: &HashSet<i64>,
    rng: &mut R,
) -> Selection<'a>
where
    R: Rng + ?Sized,
{
    let unseen: Vec<&Question> = candidates
        .iter()
        .filter(|question| !previous.contains(&question.id))
        .collect();
    match unseen.choose(rng) {
        Some(&question) => Selection::Unseen(question),
        None => Selection::Exhausted,
    }
}
