//! The insight engine: annotation, location, windowing, and summarization
//! assembled into labeled per-goal insights.

use crate::annotate::{Annotator, Document};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{InsightError, Result};
use crate::locator::locate_all;
use crate::segment::{derive_windows, select};
use crate::summarize::summarize;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// One goal's labeled summary, in ranked order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub label: String,
    pub summary: Vec<String>,
}

/// Runs the pipeline over an injected annotator
pub struct InsightEngine {
    config: Arc<Config>,
    annotator: Arc<dyn Annotator>,
}

impl InsightEngine {
    pub fn new(config: Arc<Config>, annotator: Arc<dyn Annotator>) -> Self {
        Self { config, annotator }
    }

    pub fn annotator_name(&self) -> &'static str {
        self.annotator.name()
    }

    /// Annotate raw text and assemble insights for every discussed goal.
    ///
    /// Failure to annotate the input document is fatal. A failed window
    /// re-annotation drops that goal alone and the pipeline moves on.
    pub async fn process(&self, raw_text: &str) -> Result<Vec<Insight>> {
        let doc = self.annotate(raw_text, "document annotation").await?;
        self.assemble(&doc).await
    }

    /// Assemble insights from an already annotated document
    pub async fn assemble(&self, doc: &Document) -> Result<Vec<Insight>> {
        let pipeline = &self.config.pipeline;
        let positions = locate_all(doc, Catalog::global(), pipeline.max_sentence_tokens);
        let windows = derive_windows(&positions, pipeline.window_span);
        debug!(
            "Derived {} windows from {} sentences",
            windows.len(),
            doc.len()
        );

        let mut insights = Vec::with_capacity(windows.len());
        let mut collected: Vec<String> = Vec::new();
        for window in &windows {
            if !pipeline.carry_over_sentences {
                collected.clear();
            }
            collected.extend(select(doc, window).iter().map(|s| s.text.clone()));
            let text = collected.join(" ");

            let operation = format!("goal {} window annotation", window.goal_id);
            let sub = match self.annotate(&text, &operation).await {
                Ok(sub) => sub,
                Err(e) => {
                    warn!("Dropping goal {}: {}", window.goal_id, e);
                    continue;
                }
            };
            if sub.is_empty() {
                warn!(
                    "Dropping goal {}: window produced no sentences",
                    window.goal_id
                );
                continue;
            }

            insights.push(Insight {
                label: Catalog::label(window.goal_id),
                summary: summarize(&sub, pipeline.summary_sentences),
            });
        }
        Ok(insights)
    }

    async fn annotate(&self, text: &str, operation: &str) -> Result<Document> {
        let timeout_ms = self.config.runtime.annotate_timeout_ms;
        let timeout = std::time::Duration::from_millis(timeout_ms);
        match tokio::time::timeout(timeout, self.annotator.annotate(text)).await {
            Ok(Ok(doc)) => Ok(doc),
            Ok(Err(e)) => Err(InsightError::Annotation {
                message: e.to_string(),
            }),
            Err(_) => Err(InsightError::Timeout {
                operation: operation.to_string(),
                timeout_ms,
            }),
        }
    }
}

/// Insights as a JSON object keyed by label
pub fn to_json_map(insights: &[Insight]) -> serde_json::Value {
    let mut map = serde_json::Map::with_capacity(insights.len());
    for insight in insights {
        map.insert(insight.label.clone(), serde_json::json!(insight.summary));
    }
    serde_json::Value::Object(map)
}
