//! Query orchestration: spell-check first, then route to the calculator
//! or to the keyword/search/summarize pipeline.

use std::env;

use tracing::{debug, info};

use crate::math;
use crate::openai::client::{ChatClient, OpenAiError};
use crate::query;
use crate::search;
use crate::spell::{self, SpellCheck};
use crate::summarize;

const DEFAULT_SPELL_MODEL: &str = "llama3.2:1b";
const DEFAULT_SUMMARY_MODEL: &str = "qwen3:4b";

/// Model selection for the two remote passes.
#[derive(Debug, Clone)]
pub struct Models {
    /// Small, fast model for spell checking.
    pub spell: String,
    /// Larger model for summarization.
    pub summary: String,
}

impl Models {
    /// Reads `VALET_SPELL_MODEL` and `VALET_SUMMARY_MODEL`, defaulting to
    /// the stock Ollama pair.
    pub fn from_env() -> Self {
        Self {
            spell: env::var("VALET_SPELL_MODEL").unwrap_or_else(|_| DEFAULT_SPELL_MODEL.into()),
            summary: env::var("VALET_SUMMARY_MODEL")
                .unwrap_or_else(|_| DEFAULT_SUMMARY_MODEL.into()),
        }
    }
}

impl Default for Models {
    fn default() -> Self {
        Self {
            spell: DEFAULT_SPELL_MODEL.into(),
            summary: DEFAULT_SUMMARY_MODEL.into(),
        }
    }
}

/// Everything one query produced, for reporting.
#[derive(Debug)]
pub struct Reply {
    pub spell: SpellCheck,
    pub route: Route,
}

/// Which branch the router took.
#[derive(Debug)]
pub enum Route {
    /// The raw input parsed as arithmetic; verdict from the local evaluator.
    Calculator { verdict: String },
    /// Keyword extraction, mock search, and remote summarization.
    Pipeline {
        keywords: Vec<String>,
        results: String,
        summary: String,
    },
}

/// Runs one query end to end.
///
/// The spell pass always runs first and its outcome is always reported.
/// Routing and the calculator operate on the RAW input; only the keyword
/// pipeline consumes the corrected text. A spell fault degrades to the
/// original text, while a summarizer fault propagates to the caller.
pub async fn run(
    client: &impl ChatClient,
    models: &Models,
    input: &str,
) -> Result<Reply, OpenAiError> {
    debug!(%input, "spell-check pass");
    let spell = spell::check(client, &models.spell, input).await;

    if math::is_expression(input) {
        info!("arithmetic input, routing to calculator");
        return Ok(Reply {
            spell,
            route: Route::Calculator {
                verdict: math::verdict(input),
            },
        });
    }

    let text = spell.effective_text(input);
    let keywords = query::extract_keywords(text);
    debug!(count = keywords.len(), "keywords extracted");

    let results = search::mock_results(&keywords);
    let summary = summarize::summarize(client, &models.summary, &results).await?;

    info!("pipeline complete");
    Ok(Reply {
        spell,
        route: Route::Pipeline {
            keywords,
            results,
            summary,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::client::testing::ScriptedChat;

    fn models() -> Models {
        Models {
            spell: "spell-model".into(),
            summary: "summary-model".into(),
        }
    }

    #[tokio::test]
    async fn arithmetic_routes_to_calculator_after_spell_pass() {
        let chat = ScriptedChat::replying(["25*(3+7)"]);
        let reply = run(&chat, &models(), "25*(3+7)").await.unwrap();

        assert_eq!(reply.spell, SpellCheck::Unchanged);
        match reply.route {
            Route::Calculator { verdict } => assert_eq!(verdict, "The result is: 250"),
            other => panic!("expected calculator route, got: {other:?}"),
        }

        // Only the spell pass hits the service on the math branch.
        let requests = chat.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "spell-model");
    }

    #[tokio::test]
    async fn calculator_evaluates_raw_input_not_corrected_text() {
        // A confused spell model rewrites the expression; routing and
        // evaluation must both ignore it.
        let chat = ScriptedChat::replying(["99*99"]);
        let reply = run(&chat, &models(), "2+2").await.unwrap();

        assert!(reply.spell.was_corrected());
        match reply.route {
            Route::Calculator { verdict } => assert_eq!(verdict, "The result is: 4"),
            other => panic!("expected calculator route, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn division_fault_surfaces_as_verdict_text() {
        let chat = ScriptedChat::replying(["2/0"]);
        let reply = run(&chat, &models(), "2/0").await.unwrap();

        match reply.route {
            Route::Calculator { verdict } => {
                assert!(verdict.contains("division by zero"), "got: {verdict}");
            }
            other => panic!("expected calculator route, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn pipeline_extracts_keywords_from_corrected_text() {
        let chat = ScriptedChat::replying([
            "What is the largest planet in Solar System?",
            "Jupiter is the largest planet.",
        ]);
        let reply = run(&chat, &models(), "What is the lrgest planet in Soler System?")
            .await
            .unwrap();

        assert_eq!(
            reply.spell,
            SpellCheck::Corrected("What is the largest planet in Solar System?".into())
        );
        match reply.route {
            Route::Pipeline {
                keywords,
                results,
                summary,
            } => {
                // Keywords come from the corrected text, not the raw input.
                assert_eq!(keywords, vec!["largest", "planet", "Solar", "System"]);
                assert!(results.starts_with("Search results for: largest, planet, Solar, System."));
                assert_eq!(summary, "Jupiter is the largest planet.");
            }
            other => panic!("expected pipeline route, got: {other:?}"),
        }

        let requests = chat.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].model, "spell-model");
        assert_eq!(requests[1].model, "summary-model");
        assert!(
            requests[1].messages[1]
                .content
                .contains("Search results for: largest, planet, Solar, System."),
            "summarizer must receive the mock search output"
        );
    }

    #[tokio::test]
    async fn spell_fault_degrades_to_original_text() {
        let chat = ScriptedChat::new([
            Err(OpenAiError::Api {
                code: 503,
                message: "unavailable".into(),
            }),
            Ok("A summary.".to_string()),
        ]);
        let reply = run(&chat, &models(), "Tell me about solar power")
            .await
            .unwrap();

        assert!(matches!(reply.spell, SpellCheck::ServiceFailed(_)));
        match reply.route {
            Route::Pipeline { keywords, .. } => {
                assert_eq!(keywords, vec!["about", "solar", "power"]);
            }
            other => panic!("expected pipeline route, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn summarizer_fault_propagates() {
        let chat = ScriptedChat::new([
            Ok("Tell me about solar power".to_string()),
            Err(OpenAiError::Api {
                code: 500,
                message: "boom".into(),
            }),
        ]);
        let err = run(&chat, &models(), "Tell me about solar power")
            .await
            .unwrap_err();
        assert!(matches!(err, OpenAiError::Api { code: 500, .. }));
    }

    #[tokio::test]
    #[should_panic]
    async fn short_word_query_panics_in_mock_search() {
        // "Is it ok" yields no keywords; first-keyword indexing blows up.
        let chat = ScriptedChat::replying(["Is it ok"]);
        let _ = run(&chat, &models(), "Is it ok").await;
    }
}
