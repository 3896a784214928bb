//! Client for an external annotation service (e.g. a spaCy sidecar exposing
//! `POST /annotate`). Tags arrive in Universal Dependencies form and are
//! mapped onto the local document model.

use super::{Annotator, Document, PartOfSpeech, Sentence, Token};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct RemoteAnnotator {
    client: reqwest::Client,
    url: String,
    retries: u32,
    retry_delay_ms: u64,
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    sentences: Vec<WireSentence>,
}

#[derive(Deserialize)]
struct WireSentence {
    text: String,
    tokens: Vec<WireToken>,
}

#[derive(Deserialize)]
struct WireToken {
    text: String,
    pos: String,
    #[serde(default)]
    is_stop: bool,
    #[serde(default)]
    is_punct: bool,
}

impl RemoteAnnotator {
    pub fn new(url: String, timeout_ms: u64, retries: u32, retry_delay_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .context("Failed to build reqwest client with timeout")?;
        Ok(Self {
            client,
            url,
            retries: retries.clamp(1, 5),
            retry_delay_ms,
        })
    }
}

fn into_document(response: AnnotateResponse) -> Document {
    let sentences = response
        .sentences
        .into_iter()
        .map(|sentence| {
            let tokens = sentence
                .tokens
                .into_iter()
                .map(|t| {
                    let normalized = t.text.to_lowercase();
                    Token {
                        normalized,
                        pos: PartOfSpeech::from_tag(&t.pos),
                        is_stopword: t.is_stop,
                        is_punctuation: t.is_punct,
                        text: t.text,
                    }
                })
                .collect();
            Sentence {
                text: sentence.text,
                tokens,
            }
        })
        .collect();
    Document { sentences }
}

#[async_trait]
impl Annotator for RemoteAnnotator {
    async fn annotate(&self, text: &str) -> Result<Document> {
        debug!("Requesting remote annotation ({} chars)", text.len());

        let body = AnnotateRequest { text };

        // Retry with simple exponential backoff
        let mut last_err: Option<anyhow::Error> = None;
        for i in 0..self.retries {
            let send_res = self
                .client
                .post(&self.url)
                .json(&body)
                .send()
                .await
                .context("Failed to send request to annotation service");
            let response = match send_res {
                Ok(resp) => resp,
                Err(e) => {
                    last_err = Some(e);
                    let delay_ms = self.retry_delay_ms * (1u64 << i);
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                    continue;
                }
            };

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                last_err = Some(anyhow::anyhow!(
                    "Annotation service error {}: {}",
                    status,
                    error_text
                ));
                let delay_ms = self.retry_delay_ms * (1u64 << i);
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                continue;
            }

            let parse_res: Result<AnnotateResponse> = response
                .json()
                .await
                .context("Failed to parse annotation response");
            match parse_res {
                Ok(parsed) => return Ok(into_document(parsed)),
                Err(e) => {
                    last_err = Some(e);
                    let delay_ms = self.retry_delay_ms * (1u64 << i);
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Unknown annotation service error")))
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_mapping_preserves_order_and_tags() {
        let response = AnnotateResponse {
            sentences: vec![WireSentence {
                text: "Clean Water matters .".to_string(),
                tokens: vec![
                    WireToken {
                        text: "Clean".to_string(),
                        pos: "ADJ".to_string(),
                        is_stop: false,
                        is_punct: false,
                    },
                    WireToken {
                        text: "Water".to_string(),
                        pos: "PROPN".to_string(),
                        is_stop: false,
                        is_punct: false,
                    },
                    WireToken {
                        text: ".".to_string(),
                        pos: "PUNCT".to_string(),
                        is_stop: false,
                        is_punct: true,
                    },
                ],
            }],
        };

        let doc = into_document(response);
        assert_eq!(doc.len(), 1);
        let tokens = &doc.sentences[0].tokens;
        assert_eq!(tokens[0].pos, PartOfSpeech::Adjective);
        assert_eq!(tokens[1].pos, PartOfSpeech::ProperNoun);
        assert_eq!(tokens[1].normalized, "water");
        assert!(tokens[2].is_punctuation);
    }

    #[test]
    fn test_unknown_tag_maps_to_other() {
        let doc = into_document(AnnotateResponse {
            sentences: vec![WireSentence {
                text: "x".to_string(),
                tokens: vec![WireToken {
                    text: "x".to_string(),
                    pos: "GIBBERISH".to_string(),
                    is_stop: false,
                    is_punct: false,
                }],
            }],
        });
        assert_eq!(doc.sentences[0].tokens[0].pos, PartOfSpeech::Other);
    }

    #[test]
    fn test_wire_format_defaults_optional_flags() {
        let parsed: AnnotateResponse = serde_json::from_str(
            r#"{"sentences":[{"text":"hi","tokens":[{"text":"hi","pos":"INTJ"}]}]}"#,
        )
        .unwrap();
        let doc = into_document(parsed);
        let token = &doc.sentences[0].tokens[0];
        assert!(!token.is_stopword);
        assert!(!token.is_punctuation);
    }
}
