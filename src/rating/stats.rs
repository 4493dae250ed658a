//! History summaries: streaks, unique words, per-word outcome counts.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub count: u32,
    pub correct: bool,
}

impl Default for Streak {
    fn default() -> Self {
        Self {
            count: 0,
            correct: true,
        }
    }
}

/// Length of the run of identical outcomes starting at the newest attempt.
///
/// `outcomes` must be ordered newest first.
pub fn current_streak<I>(outcomes: I) -> Streak
where
    I: IntoIterator<Item = bool>,
{
    let mut iter = outcomes.into_iter();
    let Some(first) = iter.next() else {
        return Streak::default();
    };

    let count = 1 + iter.take_while(|outcome| *outcome == first).count() as u32;
    Streak {
        count,
        correct: first,
    }
}

pub fn unique_words<'a, I>(words: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    words.into_iter().collect::<HashSet<_>>().len()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WordStats {
    pub successes: u32,
    pub failures: u32,
}

pub fn word_stats<'a, I>(attempts: I) -> BTreeMap<String, WordStats>
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    let mut stats: BTreeMap<String, WordStats> = BTreeMap::new();
    for (word, success) in attempts {
        let entry = stats.entry(word.to_string()).or_default();
        if success {
            entry.successes += 1;
        } else {
            entry.failures += 1;
        }
    }
    stats
}

/// Whole-percent win rate; 0 when there are no attempts.
pub fn win_rate(total: u32, wins: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    ((f64::from(wins) / f64::from(total)) * 100.0).round().min(100.0) as u8
}
