//! Prompt framing for the selector and validator oracles

use shared::Perspective;
use crate::types::CritiqueRequest;

/// A single chat message sent to the backing model
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system", content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user", content: content.into() }
    }
}

const SELECTOR_SYSTEM: &str = "You are an expert refugee employment assessor following specific guidelines.";

const ASSESSMENT_GUIDELINES: &str = r#"You are the selector in a selector-validator assessment framework. Analyse the individual's profile from the perspective named below and judge how likely the person is to gain and keep employment in the host country. A validator will review your answer for consistency and data support.

Profile fields are given as `code=value` pairs. Important codes:
- s2q14 gender, s2q15 age, s2q16 country of origin
- s4q7 highest completed education level
- s5q64 work before displacement, s5q24 type of work, work_status current status, empl_active_7d worked in the last 7 days
- s4q11_* / s4q12_* spoken and written languages (1 English, 2 Swahili, 5 Arabic)
- s9q2_3 refugee identity card, s9q2_6 work permit
- disabled summary disability flag, s9q4-s9q7 vision, hearing, mobility and cognitive difficulties
- depend_ratio dependants per working-age household member

Guidelines:
- Use only the provided data. Never assume or invent an attribute that is not in the profile.
- Tie every claim to a field code and its value, for example "s4q7=Primary completed".
- Use the full 1-10 scale but avoid extremes unless the data strongly supports them. 1 means major barriers with no supportive factors, 10 means extremely well positioned.
- Missing information is not evidence. Acknowledge gaps and assume an average baseline instead of deducting points.
- If there is no relevant data for this perspective, score around 5 and say the score is tentative.
- Point out contradictory values and rely on the remaining evidence.
- Keep a professional, analytical tone and do not penalise the individual for factors outside their control."#;

const SELECTOR_OUTPUT_CONTRACT: &str = r#"Respond with a single JSON object and nothing else:
{"score": <integer 1-10>, "reasoning": "<evidence-based explanation>", "confidence": <number between 0 and 1>}"#;

const VALIDATOR_OUTPUT_CONTRACT: &str = r#"Respond with a single JSON object and nothing else:
{"is_valid": <true|false>, "feedback": "<what to fix, or why it is acceptable>", "issues": ["<short issue tag>", ...]}"#;

/// Builds the chat transcripts sent to the backing model
#[derive(Debug, Clone, Default)]
pub struct PromptHandler;

impl PromptHandler {
    pub fn new() -> Self {
        Self
    }

    /// Wrap an assessment context with the guidelines and the JSON contract
    pub fn selector_messages(&self, context: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SELECTOR_SYSTEM),
            ChatMessage::user(format!(
                "{ASSESSMENT_GUIDELINES}\n\n{context}\n\n{SELECTOR_OUTPUT_CONTRACT}"
            )),
        ]
    }

    /// Render the validation checklist for one proposed score
    pub fn validator_messages(&self, request: &CritiqueRequest) -> Vec<ChatMessage> {
        let body = format!(
            "You are validating a refugee employment assessment for {country}. Check that the assessment:\n\n\
             1. Data Grounding: every claim references specific field values (e.g. \"s2q15=28\" for age)\n\
             2. No Hallucination: no information is assumed beyond what is in the profile\n\
             3. Realistic Scoring: the score aligns with the evidence and is not too harsh for missing data\n\
             4. Perspective Focus: the assessment focuses on {perspective} factors appropriately\n\n\
             PROFILE PROVIDED: {profile}\n\
             AVAILABLE FIELDS: {fields}\n\n\
             ASSESSMENT TO VALIDATE:\n\
             Score: {score}/10\n\
             Reasoning: {reasoning}\n\n\
             Identify any violations of the above criteria. The assessment should quote field codes \
             (like s2q14, s4q7) when making claims about the individual.\n\n\
             {VALIDATOR_OUTPUT_CONTRACT}",
            country = request.host_country,
            perspective = request.perspective,
            profile = request.profile,
            fields = request.available_features.join(", "),
            score = request.score,
            reasoning = request.reasoning,
        );

        vec![
            ChatMessage::system(validator_system(request.perspective)),
            ChatMessage::user(body),
        ]
    }
}

fn validator_system(perspective: Perspective) -> &'static str {
    match perspective {
        Perspective::Emotional => "You are a validation agent ensuring assessment quality and data integrity.",
        Perspective::Cultural => "Validate cultural assessments for accuracy and data integrity.",
        Perspective::Ethical => "Validate ethical assessments for accuracy and systemic considerations.",
    }
}
