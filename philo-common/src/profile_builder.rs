//! Builds a [`UserProfile`] from quiz answers and introspection text

use crate::context::extract_contexts;
use crate::profile::{
    EnhancedUserProfile, ExperienceLevel, PreferenceType, ProfileVector, Trait, UserProfile,
};
use crate::quiz::{OptionEffect, QuestionBank};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One answered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: String,
    pub value: String,
}

impl QuizAnswer {
    pub fn new(question_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            value: value.into(),
        }
    }
}

/// How answers targeting the same trait are combined
///
/// Several questions feed the same trait (conscientiousness is asked twice in the standard
/// quiz, dogmaSkeptic three times across both sets). The default keeps the answer given
/// last, matching the behavior readers have seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitMergePolicy {
    #[default]
    LastWriteWins,
    /// Mean of every contribution, rounded half up
    Average,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder {
    bank: QuestionBank,
    policy: TraitMergePolicy,
}

impl ProfileBuilder {
    pub fn new(policy: TraitMergePolicy) -> Self {
        Self {
            bank: QuestionBank::new(),
            policy,
        }
    }

    pub fn policy(&self) -> TraitMergePolicy {
        self.policy
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Fold answers, in order, into a partial profile vector
    ///
    /// Answers to unknown questions or with unknown option values are skipped.
    pub fn traits_from_answers(&self, answers: &[QuizAnswer]) -> ProfileVector {
        let mut profile = ProfileVector::default();
        let mut sums: BTreeMap<Trait, (u32, u32)> = BTreeMap::new();

        for answer in answers {
            let Some(effect) = self.bank.effect(&answer.question_id, &answer.value) else {
                debug!(
                    question_id = %answer.question_id,
                    value = %answer.value,
                    "Skipping answer with no matching question option"
                );
                continue;
            };

            match effect {
                OptionEffect::Trait { target, score } => match self.policy {
                    TraitMergePolicy::LastWriteWins => profile.traits.set(target, score),
                    TraitMergePolicy::Average => {
                        let entry = sums.entry(target).or_insert((0, 0));
                        entry.0 += score as u32;
                        entry.1 += 1;
                    }
                },
                OptionEffect::Tone { tone } => profile.tone = Some(tone),
            }
        }

        for (t, (sum, count)) in sums {
            let mean = (2 * sum + count) / (2 * count);
            profile.traits.set(t, mean as u8);
        }

        profile
    }

    /// Build the complete profile for one session
    pub fn build(
        &self,
        answers: &[QuizAnswer],
        introspection_text: &str,
        experience_level: ExperienceLevel,
        enhanced_profile: Option<EnhancedUserProfile>,
    ) -> UserProfile {
        let personality_traits = self.traits_from_answers(answers);
        let extracted_contexts = extract_contexts(introspection_text);
        let wants_contrast = enhanced_profile
            .as_ref()
            .is_some_and(|e| e.preference_type == PreferenceType::Contrast);

        debug!(
            answers = answers.len(),
            traits = personality_traits.traits.present().count(),
            contexts = extracted_contexts.len(),
            wants_contrast,
            "Built user profile"
        );

        UserProfile {
            introspection_text: introspection_text.to_string(),
            wants_contrast,
            experience_level,
            personality_traits,
            extracted_contexts,
            enhanced_profile,
        }
    }
}

/// Build a profile with the standard question bank and last-write-wins merging
pub fn build_user_profile(
    answers: &[QuizAnswer],
    introspection_text: &str,
    experience_level: ExperienceLevel,
    enhanced_profile: Option<EnhancedUserProfile>,
) -> UserProfile {
    ProfileBuilder::default().build(answers, introspection_text, experience_level, enhanced_profile)
}
