//! Outcome derivation from the current verdict and per-side round usage.
//!
//! The outcome is never stored. It is recomputed from the case on every read,
//! so a new verdict or a new argument is reflected immediately.

use serde::{Deserialize, Serialize};

use crate::case::{Argument, Case, Side};
use crate::exchange::MAX_ROUNDS_PER_SIDE;
use crate::verdict::Verdict;

/// Derived result of a hearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[serde(rename = "none")]
    Undecided,
    SideA,
    SideB,
    Tie,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Undecided => "none",
            Outcome::SideA => "side_a",
            Outcome::SideB => "side_b",
            Outcome::Tie => "tie",
        }
    }

    fn for_side(side: Side) -> Self {
        match side {
            Side::A => Outcome::SideA,
            Side::B => Outcome::SideB,
        }
    }
}

/// Reads verdict text and reports which side, if any, it favours.
pub trait OutcomeClassifier: Send + Sync {
    fn favored_side(&self, verdict_text: &str) -> Option<Side>;
}

/// Default classifier: looks for "side a" / "side b" mentions paired with a
/// win marker or a ruling prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseClassifier;

const WIN_MARKERS: &[&str] = &[
    "wins",
    "win",
    "won",
    "prevails",
    "prevail",
    "prevailed",
    "succeeds",
    "victorious",
    "winner",
    "winning",
];

/// Markers that may also name the winner before the side mention, as in
/// "winner: side a" or "the winning party is side b".
const LEADING_MARKERS: &[&str] = &["winner", "winning", "victor"];

const NEGATIONS: &[&str] = &["not", "no", "never", "cannot"];

const RULING_PREFIXES: &[&[&str]] = &[
    &["in", "favor", "of"],
    &["in", "favour", "of"],
    &["finds", "for"],
    &["rules", "for"],
];

/// How many words after a side mention a win marker may appear.
const MARKER_WINDOW: usize = 3;

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn side_at(tokens: &[String], i: usize) -> Option<Side> {
    if tokens.get(i).map(String::as_str) != Some("side") {
        return None;
    }
    match tokens.get(i + 1).map(String::as_str) {
        Some("a") => Some(Side::A),
        Some("b") => Some(Side::B),
        _ => None,
    }
}

impl PhraseClassifier {
    fn marker_follows(tokens: &[String], after: usize, side: Side) -> bool {
        let end = (after + MARKER_WINDOW).min(tokens.len());
        for j in after..end {
            let word = tokens[j].as_str();
            if NEGATIONS.contains(&word) {
                return false;
            }
            if side_at(tokens, j) == Some(side.other()) {
                return false;
            }
            if WIN_MARKERS.contains(&word) {
                return true;
            }
        }
        false
    }

    /// Scans backwards from the mention at `mention` for a leading marker.
    fn marker_precedes(tokens: &[String], mention: usize, side: Side) -> bool {
        let start = mention.saturating_sub(MARKER_WINDOW);
        for j in (start..mention).rev() {
            let word = tokens[j].as_str();
            if NEGATIONS.contains(&word) {
                return false;
            }
            if j > 0 && side_at(tokens, j - 1) == Some(side.other()) {
                return false;
            }
            if LEADING_MARKERS.contains(&word) {
                return true;
            }
        }
        false
    }

    fn ruling_precedes(tokens: &[String], mention: usize) -> bool {
        RULING_PREFIXES.iter().any(|prefix| {
            mention >= prefix.len() && tokens[mention - prefix.len()..mention] == **prefix
        })
    }

    fn winning_sides(text: &str) -> (bool, bool) {
        let tokens = tokenize(text);
        let (mut a, mut b) = (false, false);

        for i in 0..tokens.len() {
            let Some(side) = side_at(&tokens, i) else {
                continue;
            };
            let wins = Self::ruling_precedes(&tokens, i)
                || Self::marker_precedes(&tokens, i, side)
                || Self::marker_follows(&tokens, i + 2, side);
            if wins {
                match side {
                    Side::A => a = true,
                    Side::B => b = true,
                }
            }
        }

        (a, b)
    }
}

impl OutcomeClassifier for PhraseClassifier {
    fn favored_side(&self, verdict_text: &str) -> Option<Side> {
        match Self::winning_sides(verdict_text) {
            (true, false) => Some(Side::A),
            (false, true) => Some(Side::B),
            _ => None,
        }
    }
}

/// Pure outcome rule over a hearing's arguments and its current verdict.
///
/// A favoured side wins only once at least one side has exhausted its rounds;
/// with both exhausted and no clear favourite the hearing is a tie.
pub fn derive_outcome(
    arguments: &[Argument],
    verdict: Option<&Verdict>,
    classifier: &dyn OutcomeClassifier,
) -> Outcome {
    let Some(verdict) = verdict else {
        return Outcome::Undecided;
    };

    let exhausted = |side: Side| {
        arguments.iter().filter(|a| a.side == side).count() as u32 >= MAX_ROUNDS_PER_SIDE
    };
    let (a_done, b_done) = (exhausted(Side::A), exhausted(Side::B));

    if let Some(side) = classifier.favored_side(&verdict.text) {
        if a_done || b_done {
            return Outcome::for_side(side);
        }
    }
    if a_done && b_done {
        return Outcome::Tie;
    }
    Outcome::Undecided
}

impl Case {
    pub fn outcome(&self, classifier: &dyn OutcomeClassifier) -> Outcome {
        derive_outcome(&self.arguments, self.verdict.as_ref(), classifier)
    }
}
