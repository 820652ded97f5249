//! Profile vectors and user profiles
//!
//! A [`ProfileVector`] describes either a reader (partially filled from quiz answers) or a
//! book (fully filled by curation or import). Every numeric trait is optional: a missing
//! trait is unknown and is skipped by the scorer, it is never read as zero.

use crate::context::extract_contexts;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One numeric dimension of a personality/philosophy profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
    /// Theoretical (0) to practical (100)
    Practicality,
    /// Dogmatic (0) to skeptical (100)
    DogmaSkeptic,
    /// Acceptance (0) to action-oriented (100)
    AcceptanceAction,
}

impl Trait {
    /// All traits, in scoring order
    pub const ALL: [Trait; 8] = [
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Extraversion,
        Trait::Agreeableness,
        Trait::Neuroticism,
        Trait::Practicality,
        Trait::DogmaSkeptic,
        Trait::AcceptanceAction,
    ];

    /// Traits scored by complement instead of distance when the reader wants contrast
    pub const CONTRAST_SCORED: [Trait; 3] = [
        Trait::Practicality,
        Trait::DogmaSkeptic,
        Trait::AcceptanceAction,
    ];

    /// Traits flipped to `100 - v` for the contrasting recommendation pass
    pub const INVERTED_FOR_CONTRAST: [Trait; 4] = [
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::DogmaSkeptic,
        Trait::AcceptanceAction,
    ];

    /// camelCase name, as used on the wire
    pub fn name(self) -> &'static str {
        match self {
            Trait::Openness => "openness",
            Trait::Conscientiousness => "conscientiousness",
            Trait::Extraversion => "extraversion",
            Trait::Agreeableness => "agreeableness",
            Trait::Neuroticism => "neuroticism",
            Trait::Practicality => "practicality",
            Trait::DogmaSkeptic => "dogmaSkeptic",
            Trait::AcceptanceAction => "acceptanceAction",
        }
    }

    pub fn is_contrast_scored(self) -> bool {
        Self::CONTRAST_SCORED.contains(&self)
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A trait score, always within 0..=100
///
/// Out-of-range input is clamped on construction and on deserialization, so scoring code
/// never has to re-check the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TraitValue(u8);

impl TraitValue {
    pub const MAX: u8 = 100;

    /// Create a value, clamping into 0..=100
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// `100 - v`
    pub fn inverted(self) -> Self {
        Self(Self::MAX - self.0)
    }
}

impl From<u8> for TraitValue {
    fn from(value: u8) -> Self {
        Self::new(value as i64)
    }
}

impl<'de> Deserialize<'de> for TraitValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Ok(Self::new(raw.round() as i64))
    }
}

/// Overall tone of a work (or of a reader's outlook)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Optimistic,
    Pessimistic,
    Neutral,
}

/// The eight numeric traits, each explicitly present or absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openness: Option<TraitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conscientiousness: Option<TraitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraversion: Option<TraitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreeableness: Option<TraitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neuroticism: Option<TraitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practicality: Option<TraitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dogma_skeptic: Option<TraitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_action: Option<TraitValue>,
}

impl TraitScores {
    pub fn get(&self, t: Trait) -> Option<TraitValue> {
        *self.slot(t)
    }

    pub fn set(&mut self, t: Trait, value: impl Into<TraitValue>) {
        *self.slot_mut(t) = Some(value.into());
    }

    /// Present traits in scoring order
    pub fn present(&self) -> impl Iterator<Item = (Trait, TraitValue)> + '_ {
        Trait::ALL
            .into_iter()
            .filter_map(move |t| self.get(t).map(|v| (t, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    fn slot(&self, t: Trait) -> &Option<TraitValue> {
        match t {
            Trait::Openness => &self.openness,
            Trait::Conscientiousness => &self.conscientiousness,
            Trait::Extraversion => &self.extraversion,
            Trait::Agreeableness => &self.agreeableness,
            Trait::Neuroticism => &self.neuroticism,
            Trait::Practicality => &self.practicality,
            Trait::DogmaSkeptic => &self.dogma_skeptic,
            Trait::AcceptanceAction => &self.acceptance_action,
        }
    }

    fn slot_mut(&mut self, t: Trait) -> &mut Option<TraitValue> {
        match t {
            Trait::Openness => &mut self.openness,
            Trait::Conscientiousness => &mut self.conscientiousness,
            Trait::Extraversion => &mut self.extraversion,
            Trait::Agreeableness => &mut self.agreeableness,
            Trait::Neuroticism => &mut self.neuroticism,
            Trait::Practicality => &mut self.practicality,
            Trait::DogmaSkeptic => &mut self.dogma_skeptic,
            Trait::AcceptanceAction => &mut self.acceptance_action,
        }
    }
}

/// Personality / philosophical-stance vector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileVector {
    #[serde(flatten)]
    pub traits: TraitScores,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
}

impl ProfileVector {
    /// Build a vector from `(trait, score)` pairs; omitted traits stay unknown
    pub fn from_scores(scores: &[(Trait, u8)]) -> Self {
        let mut profile = Self::default();
        for &(t, v) in scores {
            profile.traits.set(t, v);
        }
        profile
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn get(&self, t: Trait) -> Option<TraitValue> {
        self.traits.get(t)
    }

    /// Replace each listed trait that is present with `100 - v`
    pub fn invert(&mut self, traits: &[Trait]) {
        for &t in traits {
            if let Some(v) = self.traits.get(t) {
                self.traits.set(t, v.inverted());
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// What kind of philosophy the reader is looking for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeekingType {
    Practical,
    Theoretical,
    #[default]
    Both,
}

/// Whether the reader wants confirming or challenging perspectives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceType {
    Align,
    Contrast,
    #[default]
    Both,
}

/// Answers from the extended introspection flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedUserProfile {
    #[serde(default)]
    pub current_challenges: String,
    #[serde(default)]
    pub personality_variability: String,
    #[serde(default)]
    pub life_background: String,
    #[serde(default)]
    pub seeking_type: SeekingType,
    #[serde(default)]
    pub preference_type: PreferenceType,
    /// Traits from the enhanced assessment; replace the quiz traits when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality_traits: Option<ProfileVector>,
    /// Contexts derived upstream; replace the introspection contexts when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_contexts: Option<BTreeSet<String>>,
}

/// Everything the recommender knows about one reader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub introspection_text: String,
    #[serde(default)]
    pub wants_contrast: bool,
    #[serde(default, alias = "experienceWithPhilosophy")]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub personality_traits: ProfileVector,
    /// Contexts found in `introspection_text` when the profile was built; scoring re-derives them
    #[serde(default)]
    pub extracted_contexts: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_profile: Option<EnhancedUserProfile>,
}

impl UserProfile {
    /// Traits used for scoring: the enhanced assessment wins over the quiz
    pub fn effective_traits(&self) -> &ProfileVector {
        self.enhanced_profile
            .as_ref()
            .and_then(|e| e.personality_traits.as_ref())
            .unwrap_or(&self.personality_traits)
    }

    /// Contexts used for scoring
    ///
    /// Upstream-extracted contexts win; otherwise they are extracted afresh from
    /// `introspection_text`, so a stored `extracted_contexts` can never disagree with the text.
    pub fn effective_contexts(&self) -> BTreeSet<String> {
        match self
            .enhanced_profile
            .as_ref()
            .and_then(|e| e.extracted_contexts.as_ref())
        {
            Some(contexts) => contexts.clone(),
            None => extract_contexts(&self.introspection_text),
        }
    }

    pub fn seeking_type(&self) -> Option<SeekingType> {
        self.enhanced_profile.as_ref().map(|e| e.seeking_type)
    }

    /// Copy of this profile with the contrast traits of the effective vector inverted
    ///
    /// Unknown traits stay unknown.
    pub fn inverted_for_contrast(&self) -> Self {
        let mut inverted = self.clone();
        let traits = match inverted
            .enhanced_profile
            .as_mut()
            .and_then(|e| e.personality_traits.as_mut())
        {
            Some(enhanced) => enhanced,
            None => &mut inverted.personality_traits,
        };
        traits.invert(&Trait::INVERTED_FOR_CONTRAST);
        inverted
    }
}
