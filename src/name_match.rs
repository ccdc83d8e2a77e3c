//! Fuzzy matching between roster names and the names the bookmaker prints.
//!
//! Names are compared after lowercasing, turning punctuation into spaces and
//! sorting the words, so "Vazquez D." and "D. Vazquez" compare equal. The
//! score is the insert/delete (Indel) similarity of the two sorted strings,
//! which keeps a shortened first name ("l martinez" vs "lautaro martinez"
//! scores 77) above the threshold.

use rapidfuzz::fuzz;

/// Minimum score (0-100) for a candidate to count as the same player.
/// Raising it trades missed matches for fewer wrong ones.
pub const SIMILARITY_THRESHOLD: u32 = 70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    pub name: String,
    pub score: u32,
}

pub fn find_best_match<S: AsRef<str>>(target: &str, candidates: &[S]) -> Option<NameMatch> {
    find_best_match_with_threshold(target, candidates, SIMILARITY_THRESHOLD)
}

pub fn find_best_match_with_threshold<S: AsRef<str>>(
    target: &str,
    candidates: &[S],
    threshold: u32,
) -> Option<NameMatch> {
    if candidates.is_empty() {
        return None;
    }

    let wanted = sorted_tokens(target);
    let mut best: Option<(&str, u32)> = None;
    for candidate in candidates {
        let candidate = candidate.as_ref();
        let score = ratio(&wanted, &sorted_tokens(candidate));
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((candidate, score));
            if score == 100 {
                break;
            }
        }
    }

    let (name, score) = best?;
    (score >= threshold).then(|| NameMatch {
        name: name.to_string(),
        score,
    })
}

/// Word-order insensitive similarity on a 0-100 scale.
pub fn token_sort_ratio(a: &str, b: &str) -> u32 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

// Python-style rounding: exact halves go to the even neighbour.
fn ratio(a: &str, b: &str) -> u32 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let similarity = fuzz::ratio(a.chars(), b.chars());
    (similarity * 100.0).round_ties_even() as u32
}

fn sorted_tokens(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
