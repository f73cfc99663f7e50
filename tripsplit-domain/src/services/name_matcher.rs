use crate::model::{ParticipantId, TripParticipant};

/// Minimum confidence for a fuzzy name match to be accepted.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.85;

// Scores below this are not treated as candidates at all.
const MIN_CANDIDATE_SCORE: f64 = 0.5;

// Weight applied to token-level matches so that a partial name ("bob" for
// "Bob Smith") never outranks an exact full-name match.
const TOKEN_MATCH_WEIGHT: f64 = 0.95;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NameMatch {
    pub user_id: ParticipantId,
    pub confidence: f64,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum NameMatchError {
    #[error("no participant matches '{identifier}'")]
    NoMatch { identifier: String },
    #[error("'{identifier}' matches more than one participant")]
    Ambiguous {
        identifier: String,
        candidates: Vec<ParticipantId>,
    },
}

/// Matches a free-form name against the trip's participants.
pub trait NameMatcher {
    fn match_single(
        &self,
        identifier: &str,
        participants: &[TripParticipant],
    ) -> Result<NameMatch, NameMatchError>;
}

/// Edit-distance plus token-overlap scorer.
#[derive(Clone, Copy, Debug, Default)]
pub struct FuzzyNameMatcher;

impl FuzzyNameMatcher {
    /// Similarity in `[0, 1]` between a typed name and a participant's full name.
    pub fn score(identifier: &str, full_name: &str) -> f64 {
        let query = normalize(identifier);
        let target = normalize(full_name);
        if query.is_empty() || target.is_empty() {
            return 0.0;
        }
        if query == target {
            return 1.0;
        }

        let full = similarity(&query, &target);

        let target_tokens: Vec<&str> = target.split(' ').collect();
        let query_tokens: Vec<&str> = query.split(' ').collect();
        let token_total: f64 = query_tokens
            .iter()
            .map(|query_token| {
                target_tokens
                    .iter()
                    .map(|target_token| similarity(query_token, target_token))
                    .fold(0.0, f64::max)
            })
            .sum();
        let overlap = token_total / query_tokens.len() as f64;

        full.max(overlap * TOKEN_MATCH_WEIGHT)
    }
}

impl NameMatcher for FuzzyNameMatcher {
    fn match_single(
        &self,
        identifier: &str,
        participants: &[TripParticipant],
    ) -> Result<NameMatch, NameMatchError> {
        let mut best: Option<NameMatch> = None;
        let mut tied: Vec<ParticipantId> = Vec::new();

        for participant in participants {
            let confidence = Self::score(identifier, &participant.full_name);
            if confidence < MIN_CANDIDATE_SCORE {
                continue;
            }
            match best {
                Some(current) if confidence < current.confidence => {}
                Some(current) if confidence == current.confidence => {
                    tied.push(participant.user_id);
                }
                _ => {
                    best = Some(NameMatch {
                        user_id: participant.user_id,
                        confidence,
                    });
                    tied.clear();
                    tied.push(participant.user_id);
                }
            }
        }

        match best {
            None => Err(NameMatchError::NoMatch {
                identifier: identifier.to_string(),
            }),
            Some(_) if tied.len() > 1 => Err(NameMatchError::Ambiguous {
                identifier: identifier.to_string(),
                candidates: tied,
            }),
            Some(found) => Ok(found),
        }
    }
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, &b_char) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != b_char);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
