use serde::Deserialize;
use tracing::warn;

use cortex_core::models::FactType;
use cortex_core::traits::{ChatMessage, ChatOptions, ILlmProvider};

/// A fact candidate surfaced by extraction, before it goes through belief
/// revision (spec §4.6 step 4). Field names mirror `Fact`/`Triple` so the
/// caller can build a `Fact` directly from one of these.
#[derive(Debug, Clone)]
pub struct FactCandidate {
    pub text: String,
    pub fact_type: FactType,
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub confidence: u8,
}

#[derive(Debug, Deserialize)]
struct ExtractedFact {
    text: String,
    #[serde(default)]
    fact_type: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    predicate: Option<String>,
    #[serde(default)]
    confidence: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    #[serde(default)]
    facts: Vec<ExtractedFact>,
}

const SYSTEM_PROMPT: &str = "You extract durable facts worth remembering from a conversation \
exchange. Return JSON: {\"facts\": [{\"text\": str, \"factType\": one of preference|identity|\
knowledge|relationship|event|observation|custom, \"subject\": str|null, \"predicate\": str|null, \
\"confidence\": 0-100}]}. Return an empty list when nothing durable is present.";

/// Extract candidate facts from one exchange. Never fails the caller:
/// any provider or parse error is logged and treated as "no facts found"
/// (spec §7 "orchestrator catches LLMError during optional fact
/// extraction and degrades").
pub async fn extract_facts(llm: &(impl ILlmProvider + ?Sized), exchange: &str) -> Vec<FactCandidate> {
    let messages = [
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(exchange),
    ];
    let options = ChatOptions {
        temperature: Some(0.0),
        ..ChatOptions::default()
    };

    let raw = match llm.chat(&messages, &options).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!(error = %err, provider = llm.name(), "fact extraction call failed, skipping");
            return Vec::new();
        }
    };

    match serde_json::from_str::<ExtractionResponse>(&raw) {
        Ok(parsed) => parsed.facts.into_iter().filter_map(to_candidate).collect(),
        Err(err) => {
            warn!(error = %err, "fact extraction response was not valid JSON, skipping");
            Vec::new()
        }
    }
}

fn to_candidate(extracted: ExtractedFact) -> Option<FactCandidate> {
    if extracted.text.trim().is_empty() {
        return None;
    }
    let fact_type = match extracted.fact_type.as_deref().unwrap_or("observation") {
        "preference" => FactType::Preference,
        "identity" => FactType::Identity,
        "knowledge" => FactType::Knowledge,
        "relationship" => FactType::Relationship,
        "event" => FactType::Event,
        "observation" => FactType::Observation,
        "custom" => FactType::Custom,
        other => {
            warn!(fact_type = other, "unknown extracted fact type, defaulting to observation");
            FactType::Observation
        }
    };
    Some(FactCandidate {
        text: extracted.text,
        fact_type,
        subject: extracted.subject,
        predicate: extracted.predicate,
        confidence: extracted.confidence.unwrap_or(70).min(100),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::errors::CortexResult;

    struct StubLlm(&'static str);

    #[async_trait::async_trait]
    impl ILlmProvider for StubLlm {
        async fn chat(&self, _messages: &[ChatMessage], _options: &ChatOptions) -> CortexResult<String> {
            Ok(self.0.to_string())
        }
        fn name(&self) -> &str {
            "stub"
        }
    }

    #[tokio::test]
    async fn parses_well_formed_extraction() {
        let llm = StubLlm(r#"{"facts":[{"text":"likes jazz","factType":"preference","confidence":90}]}"#);
        let facts = extract_facts(&llm, "exchange").await;
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].fact_type, FactType::Preference);
        assert_eq!(facts[0].confidence, 90);
    }

    #[tokio::test]
    async fn empty_list_is_not_an_error() {
        let llm = StubLlm(r#"{"facts":[]}"#);
        let facts = extract_facts(&llm, "exchange").await;
        assert!(facts.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_degrades_to_empty() {
        let llm = StubLlm("not json");
        let facts = extract_facts(&llm, "exchange").await;
        assert!(facts.is_empty());
    }
}
