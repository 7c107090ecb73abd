//! Journal record types — the persisted wire format plus derived views.
//!
//! `Record` mirrors one JSON document in the store, written by the external
//! producer. `EnrichedRecord` wraps it with classifier outputs, computed on
//! demand and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

use crate::error::{MemoryError, MemoryResult};

/// The two fixed conversational roles in the journal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The journal's subject — the "self" role whose growth is tracked.
    Client,
    /// The counterpart guiding the session.
    Therapist,
}

impl Speaker {
    /// True for the role whose own expressions are scored for vulnerability.
    pub fn is_subject(&self) -> bool {
        matches!(self, Self::Client)
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    crate::time_utils::parse_timestamp(&s).map_err(serde::de::Error::custom)
}

fn serialize_timestamp<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

/// One persisted conversational turn. Immutable once loaded.
///
/// Unknown fields in the source document are tolerated — the producer may
/// version its format ahead of this reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(
        deserialize_with = "deserialize_timestamp",
        serialize_with = "serialize_timestamp"
    )]
    pub timestamp: DateTime<Utc>,
    pub sender: Speaker,
    pub content: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_topics: Vec<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Closed set of therapeutic categories. No category is added at runtime,
/// so a fixed enum (not open-ended dispatch) is the right shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SelfDiscovery,
    EmotionalAwareness,
    RelationshipPatterns,
    GrowthMoments,
    CopingMechanisms,
    ExistentialInsights,
    CommunicationStyle,
    TriggersChallenges,
    TherapeuticGoals,
    ProgressMarkers,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfDiscovery => "self_discovery",
            Self::EmotionalAwareness => "emotional_awareness",
            Self::RelationshipPatterns => "relationship_patterns",
            Self::GrowthMoments => "growth_moments",
            Self::CopingMechanisms => "coping_mechanisms",
            Self::ExistentialInsights => "existential_insights",
            Self::CommunicationStyle => "communication_style",
            Self::TriggersChallenges => "triggers_challenges",
            Self::TherapeuticGoals => "therapeutic_goals",
            Self::ProgressMarkers => "progress_markers",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self_discovery" => Ok(Self::SelfDiscovery),
            "emotional_awareness" => Ok(Self::EmotionalAwareness),
            "relationship_patterns" => Ok(Self::RelationshipPatterns),
            "growth_moments" => Ok(Self::GrowthMoments),
            "coping_mechanisms" => Ok(Self::CopingMechanisms),
            "existential_insights" => Ok(Self::ExistentialInsights),
            "communication_style" => Ok(Self::CommunicationStyle),
            "triggers_challenges" => Ok(Self::TriggersChallenges),
            "therapeutic_goals" => Ok(Self::TherapeuticGoals),
            "progress_markers" => Ok(Self::ProgressMarkers),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Phase of the session a record belongs to, by keyword heuristic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Opening,
    Exploration,
    Insight,
    Integration,
    Closing,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalIntensity {
    Low,
    Medium,
    High,
    Breakthrough,
}

impl EmotionalIntensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Breakthrough => "breakthrough",
        }
    }
}

/// How far an insight has been worked into day-to-day behavior.
/// Enrichment always starts at `Processing`; later stages belong to a
/// future write path outside this crate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    New,
    #[default]
    Processing,
    Integrated,
    Applied,
}

/// A record plus its derived classifier signals.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedRecord {
    pub record: Record,
    pub category: Category,
    pub insight_level: f64,
    pub growth_indicator: bool,
    pub integration_status: IntegrationStatus,
    pub session_phase: SessionPhase,
    pub vulnerability_level: f64,
    pub breakthrough: bool,
    pub intensity: EmotionalIntensity,
}

impl EnrichedRecord {
    /// Construct with range validation. Scores outside [0,1] are a logic
    /// bug in the classifier, reported as `Contract` — never clamped here.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        record: Record,
        category: Category,
        insight_level: f64,
        growth_indicator: bool,
        session_phase: SessionPhase,
        vulnerability_level: f64,
        breakthrough: bool,
        intensity: EmotionalIntensity,
    ) -> MemoryResult<Self> {
        if !(0.0..=1.0).contains(&insight_level) {
            return Err(MemoryError::Contract(format!(
                "insight_level {} outside [0,1] for record {}",
                insight_level, record.id
            )));
        }
        if !(0.0..=1.0).contains(&vulnerability_level) {
            return Err(MemoryError::Contract(format!(
                "vulnerability_level {} outside [0,1] for record {}",
                vulnerability_level, record.id
            )));
        }
        Ok(Self {
            record,
            category,
            insight_level,
            growth_indicator,
            integration_status: IntegrationStatus::default(),
            session_phase,
            vulnerability_level,
            breakthrough,
            intensity,
        })
    }
}

/// A record paired with search scores. Ephemeral — rebuilt on every query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub record: Record,
    /// Cosine similarity in vector mode; normalized keyword score in fallback.
    pub similarity: f64,
    /// Therapeutic relevance (insight level, breakthrough-boosted in vector mode).
    pub relevance: f64,
}

impl SearchHit {
    /// Combined ranking score: arithmetic mean of similarity and relevance.
    pub fn ranking_score(&self) -> f64 {
        (self.similarity + self.relevance) / 2.0
    }
}
