use crate::{
    model::{ParticipantId, TripParticipant},
    services::name_matcher::{DEFAULT_MATCH_THRESHOLD, NameMatchError, NameMatcher},
};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("'{identifier}' is not a participant of this trip")]
    UnknownId { identifier: String },
    #[error("no participant named '{identifier}'")]
    NoMatch { identifier: String },
    #[error("'{identifier}' matches more than one participant")]
    Ambiguous { identifier: String },
    #[error("'{identifier}' only loosely matches a participant (confidence {confidence:.2})")]
    LowConfidence { identifier: String, confidence: f64 },
}

impl ResolveError {
    pub fn identifier(&self) -> &str {
        match self {
            Self::UnknownId { identifier }
            | Self::NoMatch { identifier }
            | Self::Ambiguous { identifier }
            | Self::LowConfidence { identifier, .. } => identifier,
        }
    }
}

impl From<NameMatchError> for ResolveError {
    fn from(err: NameMatchError) -> Self {
        match err {
            NameMatchError::NoMatch { identifier } => Self::NoMatch { identifier },
            NameMatchError::Ambiguous { identifier, .. } => Self::Ambiguous { identifier },
        }
    }
}

/// Outcome of payer resolution. The payer is always set; `error` explains
/// why the default was used instead of the requested payer.
#[derive(Clone, Debug, PartialEq)]
pub struct PayerResolution {
    pub payer_id: ParticipantId,
    pub error: Option<ResolveError>,
}

/// Maps names or ids typed by users onto the trip's participants.
pub struct ParticipantResolver<'a, M: NameMatcher + ?Sized> {
    participants: &'a [TripParticipant],
    matcher: &'a M,
    threshold: f64,
}

impl<'a, M: NameMatcher + ?Sized> ParticipantResolver<'a, M> {
    pub fn new(participants: &'a [TripParticipant], matcher: &'a M) -> Self {
        Self {
            participants,
            matcher,
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn participants(&self) -> &'a [TripParticipant] {
        self.participants
    }

    /// Resolves a UUID or a display name to a participant id.
    ///
    /// A UUID-shaped identifier is only accepted when it belongs to a
    /// participant; it never falls through to name matching.
    pub fn resolve_participant_id(&self, identifier: &str) -> Result<ParticipantId, ResolveError> {
        let identifier = identifier.trim();

        if let Some(id) = ParticipantId::parse(identifier) {
            return self
                .participants
                .iter()
                .find(|participant| participant.user_id == id)
                .map(|participant| participant.user_id)
                .ok_or_else(|| ResolveError::UnknownId {
                    identifier: identifier.to_string(),
                });
        }

        let found = self.matcher.match_single(identifier, self.participants)?;
        if found.confidence < self.threshold {
            return Err(ResolveError::LowConfidence {
                identifier: identifier.to_string(),
                confidence: found.confidence,
            });
        }
        Ok(found.user_id)
    }

    /// Resolves the payer, falling back to `default_payer_id` on any failure.
    pub fn resolve_payer(
        &self,
        payer: Option<&str>,
        default_payer_id: ParticipantId,
    ) -> PayerResolution {
        let Some(payer) = payer.map(str::trim).filter(|payer| !payer.is_empty()) else {
            return PayerResolution {
                payer_id: default_payer_id,
                error: None,
            };
        };

        match self.resolve_participant_id(payer) {
            Ok(payer_id) => PayerResolution {
                payer_id,
                error: None,
            },
            Err(error) => {
                tracing::warn!(
                    payer,
                    default_payer = %default_payer_id,
                    %error,
                    "Payer could not be resolved; using default payer"
                );
                PayerResolution {
                    payer_id: default_payer_id,
                    error: Some(error),
                }
            }
        }
    }
}
