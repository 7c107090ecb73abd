//! Lexical classifier — pure functions deriving signals from a record.
//!
//! Every function here is deterministic, side-effect-free, and reads only
//! the record it is given. The keyword cascades are ordered: the first
//! matching group wins, so reordering them changes observable categories.

use crate::error::MemoryResult;
use crate::record::{
    Category, EmotionalIntensity, EnrichedRecord, Record, SessionPhase,
};

// Cascade order matters: categories are mutually exclusive per record and
// earlier groups shadow later ones.
const EMOTION_WORDS: &[&str] = &["feel", "emotion", "emotional", "feelings"];
const LEARNING_WORDS: &[&str] = &["learn", "understand", "realize", "discover"];
const COPING_WORDS: &[&str] = &["cope", "strategy", "help", "manage"];
const GOAL_WORDS: &[&str] = &["goal", "progress", "improve", "growth"];
const RELATIONSHIP_WORDS: &[&str] = &["relationship", "connect", "interact", "communicate"];

const INSIGHT_PHRASES: &[&str] = &[
    "i realize",
    "i understand",
    "i see now",
    "i learned",
    "i discovered",
    "breakthrough",
    "clarity",
    "makes sense",
    "i get it",
    "aha moment",
];

const DEPTH_WORDS: &[&str] = &["deeply", "profoundly", "significantly", "important", "meaningful"];

const BREAKTHROUGH_PHRASES: &[&str] = &[
    "breakthrough",
    "epiphany",
    "suddenly understand",
    "everything clicks",
    "major realization",
    "profound insight",
    "life-changing",
    "transformative",
];

const INTENSITY_WORDS: &[&str] = &["deeply", "profoundly", "overwhelming", "intense"];
const FEELING_WORDS: &[&str] = &["feel", "emotion", "moving", "significant"];

const OPENING_WORDS: &[&str] = &["hello", "how are", "beginning", "start"];
const EXPLORATION_WORDS: &[&str] = &["explore", "tell me", "what do you think"];
const INSIGHT_PHASE_WORDS: &[&str] = &["realize", "understand", "insight", "see now"];
const INTEGRATION_WORDS: &[&str] = &["apply", "use this", "moving forward"];

const VULNERABILITY_PHRASES: &[&str] = &[
    "i feel",
    "i struggle",
    "i'm afraid",
    "i worry",
    "i don't know",
    "uncertain",
    "confused",
    "difficult for me",
    "i admit",
];

const GROWTH_KEYWORDS: &[&str] = &[
    "learned",
    "understand now",
    "realize",
    "growth",
    "progress",
    "better at",
    "improved",
    "developed",
    "gained insight",
];

// Second-person phrases marking a record as being about the journal's
// subject even when the therapist is speaking.
const SUBJECT_PHRASES: &[&str] = &[
    "you feel",
    "you seem",
    "your growth",
    "your progress",
    "you've learned",
    "you understand",
    "your insight",
    "you realize",
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Categorize by ordered keyword cascade; first match wins.
pub fn categorize(record: &Record) -> Category {
    let content = record.content.to_lowercase();
    if contains_any(&content, EMOTION_WORDS) {
        Category::EmotionalAwareness
    } else if contains_any(&content, LEARNING_WORDS) {
        Category::SelfDiscovery
    } else if contains_any(&content, COPING_WORDS) {
        Category::CopingMechanisms
    } else if contains_any(&content, GOAL_WORDS) {
        Category::TherapeuticGoals
    } else if contains_any(&content, RELATIONSHIP_WORDS) {
        Category::RelationshipPatterns
    } else {
        Category::SelfDiscovery
    }
}

/// Insight significance in [0,1]: 0.2 per insight phrase, 0.1 per depth
/// word, clamped at 1.0. The score is not normalized by phrase count, so
/// multiple matches saturate quickly.
pub fn insight_level(record: &Record) -> f64 {
    let content = record.content.to_lowercase();
    let mut score: f64 = 0.0;
    for phrase in INSIGHT_PHRASES {
        if content.contains(phrase) {
            score += 0.2;
        }
    }
    for word in DEPTH_WORDS {
        if content.contains(word) {
            score += 0.1;
        }
    }
    score.min(1.0)
}

/// True iff the content carries any fixed breakthrough phrase.
pub fn is_breakthrough(record: &Record) -> bool {
    let content = record.content.to_lowercase();
    contains_any(&content, BREAKTHROUGH_PHRASES)
}

/// Intensity by priority: breakthrough > intensity words > feeling words > low.
pub fn emotional_intensity(record: &Record) -> EmotionalIntensity {
    let content = record.content.to_lowercase();
    if is_breakthrough(record) {
        EmotionalIntensity::Breakthrough
    } else if contains_any(&content, INTENSITY_WORDS) {
        EmotionalIntensity::High
    } else if contains_any(&content, FEELING_WORDS) {
        EmotionalIntensity::Medium
    } else {
        EmotionalIntensity::Low
    }
}

/// Session phase by keyword priority; Exploration when nothing matches.
pub fn session_phase(record: &Record) -> SessionPhase {
    let content = record.content.to_lowercase();
    if contains_any(&content, OPENING_WORDS) {
        SessionPhase::Opening
    } else if contains_any(&content, EXPLORATION_WORDS) {
        SessionPhase::Exploration
    } else if contains_any(&content, INSIGHT_PHASE_WORDS) {
        SessionPhase::Insight
    } else if contains_any(&content, INTEGRATION_WORDS) {
        SessionPhase::Integration
    } else {
        SessionPhase::Exploration
    }
}

/// Openness in [0,1]. Only the subject's own expressions are scored;
/// therapist turns are always 0.
pub fn vulnerability_level(record: &Record) -> f64 {
    if !record.sender.is_subject() {
        return 0.0;
    }
    let content = record.content.to_lowercase();
    let mut score: f64 = 0.0;
    for phrase in VULNERABILITY_PHRASES {
        if content.contains(phrase) {
            score += 0.2;
        }
    }
    score.min(1.0)
}

/// True iff any growth keyword is present.
pub fn growth_indicator(record: &Record) -> bool {
    let content = record.content.to_lowercase();
    contains_any(&content, GROWTH_KEYWORDS)
}

/// Therapeutic relevance for ranking: insight level, boosted by 0.3 for
/// breakthrough records, capped at 1.0.
pub fn therapeutic_relevance(record: &Record) -> f64 {
    let mut relevance = insight_level(record);
    if is_breakthrough(record) {
        relevance += 0.3;
    }
    relevance.min(1.0)
}

/// Candidate-selection predicate: a record is "about the subject" when the
/// subject is speaking, or the content addresses them in the second person.
pub fn is_about_subject(record: &Record) -> bool {
    if record.sender.is_subject() {
        return true;
    }
    let content = record.content.to_lowercase();
    contains_any(&content, SUBJECT_PHRASES)
}

/// Compose all classifiers into an enriched record. Each signal is derived
/// independently; only the cascades inside each function are ordered.
pub fn enrich(record: &Record) -> MemoryResult<EnrichedRecord> {
    EnrichedRecord::new(
        record.clone(),
        categorize(record),
        insight_level(record),
        growth_indicator(record),
        session_phase(record),
        vulnerability_level(record),
        is_breakthrough(record),
        emotional_intensity(record),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Speaker;
    use crate::test_helpers::RecordBuilder;

    fn record_with(content: &str) -> Record {
        RecordBuilder::new().content(content).build()
    }

    #[test]
    fn test_categorize_cascade_priority() {
        // Both emotion and learning words present: emotion group is earlier
        // in the cascade and must win.
        let rec = record_with("I feel like I finally understand this");
        assert_eq!(categorize(&rec), Category::EmotionalAwareness);

        // Learning only.
        let rec = record_with("I finally understand this");
        assert_eq!(categorize(&rec), Category::SelfDiscovery);

        // Coping beats goals when both appear.
        let rec = record_with("a strategy to make progress");
        assert_eq!(categorize(&rec), Category::CopingMechanisms);
    }

    #[test]
    fn test_categorize_default() {
        let rec = record_with("the weather was grey");
        assert_eq!(categorize(&rec), Category::SelfDiscovery);
    }

    #[test]
    fn test_insight_level_accumulates_and_saturates() {
        let rec = record_with("nothing notable");
        assert_eq!(insight_level(&rec), 0.0);

        let rec = record_with("i realize this deeply");
        assert!((insight_level(&rec) - 0.3).abs() < 1e-9);

        // Six insight phrases plus depth words would exceed 1.0 unclamped.
        let rec = record_with(
            "i realize, i understand, i see now, i learned, i discovered, \
             breakthrough, clarity — deeply and profoundly important",
        );
        assert_eq!(insight_level(&rec), 1.0);
    }

    #[test]
    fn test_insight_level_always_in_range() {
        let long = "i realize clarity breakthrough makes sense aha moment ".repeat(50);
        let rec = record_with(&long);
        let level = insight_level(&rec);
        assert!((0.0..=1.0).contains(&level));
    }

    #[test]
    fn test_breakthrough_detection_case_insensitive() {
        let rec = record_with("A real BREAKTHROUGH for me");
        assert!(is_breakthrough(&rec));
        let rec = record_with("an ordinary day");
        assert!(!is_breakthrough(&rec));
    }

    #[test]
    fn test_intensity_priority_order() {
        // Breakthrough phrase outranks intensity words even when both match.
        let rec = record_with("an overwhelming epiphany");
        assert_eq!(emotional_intensity(&rec), EmotionalIntensity::Breakthrough);

        let rec = record_with("an overwhelming day");
        assert_eq!(emotional_intensity(&rec), EmotionalIntensity::High);

        let rec = record_with("it was moving");
        assert_eq!(emotional_intensity(&rec), EmotionalIntensity::Medium);

        let rec = record_with("nothing much");
        assert_eq!(emotional_intensity(&rec), EmotionalIntensity::Low);
    }

    #[test]
    fn test_session_phase_priority_and_default() {
        let rec = record_with("hello, let's explore what you realize");
        assert_eq!(session_phase(&rec), SessionPhase::Opening);

        let rec = record_with("let's explore what you realize");
        assert_eq!(session_phase(&rec), SessionPhase::Exploration);

        let rec = record_with("i realize something");
        assert_eq!(session_phase(&rec), SessionPhase::Insight);

        let rec = record_with("i will apply it tomorrow");
        assert_eq!(session_phase(&rec), SessionPhase::Integration);

        let rec = record_with("silence");
        assert_eq!(session_phase(&rec), SessionPhase::Exploration);
    }

    #[test]
    fn test_vulnerability_zero_for_therapist() {
        let rec = RecordBuilder::new()
            .sender(Speaker::Therapist)
            .content("i feel i struggle i worry")
            .build();
        assert_eq!(vulnerability_level(&rec), 0.0);
    }

    #[test]
    fn test_vulnerability_clamped_for_client() {
        let rec = RecordBuilder::new()
            .sender(Speaker::Client)
            .content("i feel, i struggle, i'm afraid, i worry, i don't know, uncertain, confused")
            .build();
        assert_eq!(vulnerability_level(&rec), 1.0);
    }

    #[test]
    fn test_growth_indicator() {
        assert!(growth_indicator(&record_with("I have improved a lot")));
        assert!(!growth_indicator(&record_with("status quo")));
    }

    #[test]
    fn test_relevance_breakthrough_boost_capped() {
        let rec = record_with("i realize deeply — a breakthrough, such clarity, it makes sense");
        // insight saturates high, boost must not push past 1.0
        assert!(therapeutic_relevance(&rec) <= 1.0);

        let rec = record_with("an epiphany");
        assert!((therapeutic_relevance(&rec) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_is_about_subject() {
        let own = RecordBuilder::new().sender(Speaker::Client).content("quiet day").build();
        assert!(is_about_subject(&own));

        let addressed = RecordBuilder::new()
            .sender(Speaker::Therapist)
            .content("You seem more settled about your progress")
            .build();
        assert!(is_about_subject(&addressed));

        let unrelated = RecordBuilder::new()
            .sender(Speaker::Therapist)
            .content("Scheduling note for next week")
            .build();
        assert!(!is_about_subject(&unrelated));
    }

    #[test]
    fn test_enrich_scenario_breakthrough_record() {
        // A client record with a realization and the word
        // "breakthrough" classifies as self-discovery at breakthrough intensity.
        let rec = RecordBuilder::new()
            .sender(Speaker::Client)
            .content("I finally realize I was avoiding conflict — a real breakthrough for me")
            .build();
        let enriched = enrich(&rec).unwrap();
        assert!(enriched.breakthrough);
        assert_eq!(enriched.intensity, EmotionalIntensity::Breakthrough);
        assert_eq!(enriched.category, Category::SelfDiscovery);
        assert!(enriched.insight_level > 0.0);
        assert_eq!(
            enriched.integration_status,
            crate::record::IntegrationStatus::Processing
        );
    }
}
