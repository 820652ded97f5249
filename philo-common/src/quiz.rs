//! Quiz question bank
//!
//! Each option of a question declares what choosing it does to the reader's profile:
//! either a score for one trait or a tone.

use crate::profile::{Tone, Trait};
use serde::Serialize;

/// What selecting an option contributes to the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OptionEffect {
    Trait {
        #[serde(rename = "trait")]
        target: Trait,
        score: u8,
    },
    Tone {
        tone: Tone,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizOption {
    pub value: &'static str,
    pub label: &'static str,
    pub effect: OptionEffect,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub id: &'static str,
    pub question: &'static str,
    pub options: Vec<QuizOption>,
}

impl QuizQuestion {
    pub fn option(&self, value: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// The standard and enhanced question sets
#[derive(Debug, Clone, Serialize)]
pub struct QuestionBank {
    pub standard: Vec<QuizQuestion>,
    pub enhanced: Vec<QuizQuestion>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self {
            standard: standard_questions(),
            enhanced: enhanced_questions(),
        }
    }

    /// Find a question by id in either set
    pub fn question(&self, id: &str) -> Option<&QuizQuestion> {
        self.standard
            .iter()
            .chain(self.enhanced.iter())
            .find(|q| q.id == id)
    }

    /// Resolve an answer to the effect of the chosen option
    pub fn effect(&self, question_id: &str, value: &str) -> Option<OptionEffect> {
        self.question(question_id)?.option(value).map(|o| o.effect)
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::new()
    }
}

fn question(id: &'static str, text: &'static str, options: Vec<QuizOption>) -> QuizQuestion {
    QuizQuestion {
        id,
        question: text,
        options,
    }
}

fn scored(value: &'static str, label: &'static str, target: Trait, score: u8) -> QuizOption {
    QuizOption {
        value,
        label,
        effect: OptionEffect::Trait { target, score },
    }
}

fn toned(value: &'static str, label: &'static str, tone: Tone) -> QuizOption {
    QuizOption {
        value,
        label,
        effect: OptionEffect::Tone { tone },
    }
}

fn standard_questions() -> Vec<QuizQuestion> {
    use Trait::*;

    vec![
        question("question-1", "How do you typically approach new ideas or concepts?", vec![
            scored("a", "I embrace them enthusiastically and want to explore their possibilities", Openness, 90),
            scored("b", "I consider them carefully and evaluate them against established knowledge", Openness, 60),
            scored("c", "I'm skeptical of new ideas until they prove their worth", Openness, 30),
            scored("d", "I prefer to stick with traditional approaches that have stood the test of time", Openness, 10),
        ]),
        question("question-2", "When faced with a difficult situation, you typically:", vec![
            scored("a", "Plan methodically and follow through with discipline", Conscientiousness, 90),
            scored("b", "Make a general plan but adapt as circumstances change", Conscientiousness, 70),
            scored("c", "Handle things as they come without much advance planning", Conscientiousness, 40),
            scored("d", "Trust that things will work out and focus on the present moment", Conscientiousness, 20),
        ]),
        question("question-3", "In social situations, you are more likely to:", vec![
            scored("a", "Energize the room and engage with many people", Extraversion, 90),
            scored("b", "Enjoy conversation with a smaller group of people", Extraversion, 70),
            scored("c", "Listen more than speak, offering thoughts when relevant", Extraversion, 40),
            scored("d", "Prefer one-on-one interactions or observing from the sidelines", Extraversion, 10),
        ]),
        question("question-4", "When someone disagrees with you on an important issue:", vec![
            scored("a", "I try to understand their perspective and find common ground", Agreeableness, 90),
            scored("b", "I listen to their view but defend my position firmly", Agreeableness, 60),
            scored("c", "I focus on the logical flaws in their argument", Agreeableness, 30),
            scored("d", "I find it difficult to respect positions I fundamentally disagree with", Agreeableness, 10),
        ]),
        question("question-5", "How do you typically respond to stress or setbacks?", vec![
            scored("a", "I remain calm and look for practical solutions", Neuroticism, 10),
            scored("b", "I feel the initial anxiety but then regain my composure", Neuroticism, 40),
            scored("c", "I worry significantly about the implications", Neuroticism, 70),
            scored("d", "I tend to feel overwhelmed and dwell on the negative possibilities", Neuroticism, 90),
        ]),
        question("question-6", "Which statement best describes your view on personal responsibility?", vec![
            scored("a", "We are entirely responsible for our own choices and their outcomes", Conscientiousness, 90),
            scored("b", "We're largely responsible for our choices, though circumstances play a role", Conscientiousness, 70),
            scored("c", "Our choices are significantly shaped by social and environmental factors", Conscientiousness, 40),
            scored("d", "Free will is largely an illusion; we're products of forces beyond our control", Conscientiousness, 10),
        ]),
        question("question-7", "When seeking meaning in life, which approach resonates most?", vec![
            scored("a", "Finding purpose through duty and contribution to society", AcceptanceAction, 50),
            scored("b", "Creating your own meaning through authentic personal choices", AcceptanceAction, 90),
            scored("c", "Accepting that life has no inherent meaning but finding joy regardless", AcceptanceAction, 30),
            scored("d", "Connecting to traditional or spiritual frameworks that provide guidance", AcceptanceAction, 10),
        ]),
        question("question-8", "How do you view human suffering?", vec![
            toned("a", "An opportunity for growth and developing strength of character", Tone::Optimistic),
            toned("b", "A natural part of existence that should be accepted with equanimity", Tone::Neutral),
            toned("c", "Something to be analyzed and understood to reduce its impact", Tone::Neutral),
            toned("d", "A profound problem that reveals the tragic nature of human existence", Tone::Pessimistic),
        ]),
        question("question-9", "What kind of philosophical approach do you prefer?", vec![
            scored("a", "Practical wisdom I can apply to my daily life", Practicality, 90),
            scored("b", "A balance of theory and practical application", Practicality, 60),
            scored("c", "Deep theoretical frameworks that explain the world", Practicality, 30),
            scored("d", "Abstract concepts that challenge conventional thinking", Practicality, 10),
        ]),
        question("question-10", "What is your background or current worldview?", vec![
            scored("a", "Religious or spiritual tradition", DogmaSkeptic, 30),
            scored("b", "Secular humanism", DogmaSkeptic, 60),
            scored("c", "Scientific materialism", DogmaSkeptic, 80),
            scored("d", "Philosophical skepticism or questioning", DogmaSkeptic, 90),
        ]),
    ]
}

fn enhanced_questions() -> Vec<QuizQuestion> {
    use Trait::*;

    vec![
        question("enhanced-question-1", "How does your personality change in different social situations?", vec![
            scored("a", "I remain consistent regardless of who I'm with", Extraversion, 50),
            scored("b", "I become more extraverted in comfortable settings, introverted in unfamiliar ones", Extraversion, 60),
            scored("c", "I adapt significantly to match the energy of those around me", Extraversion, 70),
            scored("d", "My personality varies dramatically in different contexts", Extraversion, 80),
        ]),
        question("enhanced-question-2", "How do you respond to intellectual disagreements?", vec![
            scored("a", "I enjoy vigorous debate and often play devil's advocate", DogmaSkeptic, 85),
            scored("b", "I like to ask probing questions to understand different perspectives", DogmaSkeptic, 70),
            scored("c", "I prefer to find common ground and areas of agreement", DogmaSkeptic, 50),
            scored("d", "I rely on established authorities and principles to resolve disagreements", DogmaSkeptic, 30),
        ]),
        question("enhanced-question-3", "During challenging times in your life, do you tend to:", vec![
            scored("a", "Take immediate action to address the problem", AcceptanceAction, 90),
            scored("b", "Analyze the situation before determining a course of action", AcceptanceAction, 70),
            scored("c", "Seek to understand and accept what cannot be changed", AcceptanceAction, 40),
            scored("d", "Find meaning in difficult experiences without trying to change them", AcceptanceAction, 20),
        ]),
        question("enhanced-question-4", "How do you approach moral or ethical dilemmas?", vec![
            scored("a", "I follow consistent principles regardless of the situation", Conscientiousness, 85),
            scored("b", "I consider the unique circumstances of each situation", Conscientiousness, 65),
            scored("c", "I prioritize compassion and care for those affected", Agreeableness, 80),
            scored("d", "I weigh the practical consequences of different choices", Practicality, 75),
        ]),
        question("enhanced-question-5", "How important is tradition in your worldview?", vec![
            scored("a", "Very important - traditions contain accumulated wisdom", DogmaSkeptic, 30),
            scored("b", "Somewhat important - I respect tradition but question it", DogmaSkeptic, 50),
            scored("c", "Not very important - I evaluate ideas on their merits", DogmaSkeptic, 70),
            scored("d", "Unimportant - I'm interested in creating new possibilities", DogmaSkeptic, 90),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_sizes() {
        let bank = QuestionBank::new();
        assert_eq!(bank.standard.len(), 10);
        assert_eq!(bank.enhanced.len(), 5);
        for q in bank.standard.iter().chain(bank.enhanced.iter()) {
            assert_eq!(q.options.len(), 4, "{} should have four options", q.id);
        }
    }

    #[test]
    fn test_question_ids_unique() {
        let bank = QuestionBank::new();
        let mut ids: Vec<&str> = bank.standard.iter().chain(bank.enhanced.iter()).map(|q| q.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn test_effect_lookup() {
        let bank = QuestionBank::new();
        assert_eq!(
            bank.effect("question-9", "a"),
            Some(OptionEffect::Trait { target: Trait::Practicality, score: 90 })
        );
        assert_eq!(
            bank.effect("enhanced-question-4", "c"),
            Some(OptionEffect::Trait { target: Trait::Agreeableness, score: 80 })
        );
        assert_eq!(bank.effect("question-8", "d"), Some(OptionEffect::Tone { tone: Tone::Pessimistic }));
        assert_eq!(bank.effect("question-1", "z"), None);
        assert_eq!(bank.effect("question-99", "a"), None);
    }

    #[test]
    fn test_all_scores_in_range() {
        let bank = QuestionBank::new();
        for q in bank.standard.iter().chain(bank.enhanced.iter()) {
            for o in &q.options {
                if let OptionEffect::Trait { score, .. } = o.effect {
                    assert!(score <= 100, "{}:{} out of range", q.id, o.value);
                }
            }
        }
    }

    #[test]
    fn test_effect_serialization() {
        let json = serde_json::to_value(OptionEffect::Trait { target: Trait::DogmaSkeptic, score: 30 }).unwrap();
        assert_eq!(json["kind"], "trait");
        assert_eq!(json["trait"], "dogmaSkeptic");
        assert_eq!(json["score"], 30);
    }
}
