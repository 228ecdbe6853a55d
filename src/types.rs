// =============================================================================
// Shared types used across the TokenScope analysis engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// A single indicator's discrete opinion about the latest bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalVote {
    Buy,
    Sell,
    #[default]
    Neutral,
}

impl std::fmt::Display for SignalVote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Aggregated trading recommendation derived from the vote counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    #[default]
    Neutral,
    Sell,
    StrongSell,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongBuy => write!(f, "STRONG_BUY"),
            Self::Buy => write!(f, "BUY"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Sell => write!(f, "SELL"),
            Self::StrongSell => write!(f, "STRONG_SELL"),
        }
    }
}

/// Outcome tag attached to every analysis report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Success,
    LimitedData,
    InvalidData,
    NoData,
    AnalysisError,
}

impl AnalysisStatus {
    /// `true` when the report carries indicators and scores.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::LimitedData => write!(f, "limited_data"),
            Self::InvalidData => write!(f, "invalid_data"),
            Self::NoData => write!(f, "no_data"),
            Self::AnalysisError => write!(f, "analysis_error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(Recommendation::StrongBuy.to_string(), "STRONG_BUY");
        assert_eq!(AnalysisStatus::LimitedData.to_string(), "limited_data");
        assert_eq!(SignalVote::Neutral.to_string(), "NEUTRAL");

        let json = serde_json::to_string(&Recommendation::StrongSell).unwrap();
        assert_eq!(json, "\"STRONG_SELL\"");
        let json = serde_json::to_string(&AnalysisStatus::AnalysisError).unwrap();
        assert_eq!(json, "\"analysis_error\"");
    }

    #[test]
    fn only_success_is_complete() {
        assert!(AnalysisStatus::Success.is_complete());
        assert!(!AnalysisStatus::LimitedData.is_complete());
        assert!(!AnalysisStatus::NoData.is_complete());
    }

    #[test]
    fn votes_and_recommendations_default_to_neutral() {
        assert_eq!(SignalVote::default(), SignalVote::Neutral);
        assert_eq!(Recommendation::default(), Recommendation::Neutral);
    }
}
