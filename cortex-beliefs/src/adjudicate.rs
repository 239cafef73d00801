use serde::Deserialize;
use tracing::warn;

use cortex_core::models::{BeliefOutcome, Fact};
use cortex_core::traits::{ChatMessage, ChatOptions, ILlmProvider};

/// Stage 3 decision (spec §4.4): what to do with a candidate fact that
/// conflicts with an existing active fact in the same slot or above the
/// semantic similarity threshold.
#[derive(Debug, Clone)]
pub struct Adjudication {
    pub outcome: BeliefOutcome,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
struct LlmVerdict {
    outcome: String,
    reason: String,
}

/// The policy used when no LLM adjudicator is configured (spec §4.4, §9
/// Open Questions): supersede a conflicting fact in the same slot, or
/// create on novelty. Stage 3 is only reached once a conflict exists, so
/// this never has to decide `Create` itself — the pipeline does that
/// directly when `conflict` is `None`.
pub fn deterministic_fallback(_conflict: &Fact) -> Adjudication {
    Adjudication {
        outcome: BeliefOutcome::Supersede,
        reason: "no LLM adjudicator configured: deterministic policy supersedes on slot conflict"
            .to_string(),
    }
}

/// Ask the configured LLM to adjudicate a candidate against its
/// conflicting fact. Falls back to the deterministic policy on any
/// malformed or unparsable response rather than failing the whole
/// revision (spec §7: LLM errors degrade gracefully).
pub async fn llm_adjudicate(
    llm: &(impl ILlmProvider + ?Sized),
    candidate: &Fact,
    conflict: &Fact,
) -> Adjudication {
    let prompt = format!(
        "Existing fact: \"{}\" (confidence {}).\nNew candidate fact: \"{}\" (confidence {}).\n\
         Decide one of: supersede (the candidate replaces the existing fact), \
         update (merge the candidate into the existing fact in place), \
         skip (the candidate adds nothing new), create (both are independently true).\n\
         Respond as JSON: {{\"outcome\": \"...\", \"reason\": \"...\"}}",
        conflict.fact, conflict.confidence, candidate.fact, candidate.confidence,
    );
    let messages = [
        ChatMessage::system("You adjudicate conflicting memory facts for a belief revision pipeline."),
        ChatMessage::user(prompt),
    ];
    let options = ChatOptions::default();

    match llm.chat(&messages, &options).await {
        Ok(raw) => parse_verdict(&raw).unwrap_or_else(|| {
            warn!(response = %raw, "LLM adjudication response unparsable, falling back");
            deterministic_fallback(conflict)
        }),
        Err(err) => {
            warn!(error = %err, "LLM adjudication call failed, falling back");
            deterministic_fallback(conflict)
        }
    }
}

fn parse_verdict(raw: &str) -> Option<Adjudication> {
    let verdict: LlmVerdict = serde_json::from_str(raw.trim()).ok()?;
    let outcome = match verdict.outcome.to_lowercase().as_str() {
        "supersede" => BeliefOutcome::Supersede,
        "update" => BeliefOutcome::Update,
        "skip" => BeliefOutcome::Skip,
        "create" => BeliefOutcome::Create,
        _ => return None,
    };
    Some(Adjudication {
        outcome,
        reason: verdict.reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_verdict() {
        let raw = r#"{"outcome": "update", "reason": "merge confidence"}"#;
        let verdict = parse_verdict(raw).expect("parses");
        assert_eq!(verdict.outcome, BeliefOutcome::Update);
    }

    #[test]
    fn rejects_unknown_outcome() {
        assert!(parse_verdict(r#"{"outcome": "explode", "reason": "x"}"#).is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_verdict("not json").is_none());
    }
}
