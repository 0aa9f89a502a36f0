use std::collections::HashSet;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use crate::config::LlmConfig;
use crate::models::{ChatRequest, ChatResponse, Language, MenuItem};

/// Owns prompt construction and reply validation; the model call itself is
/// one best-effort HTTP request. Every failure path collapses into a
/// localized apology so the chat UI never sees a raw error.
pub struct Recommender {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

/// Reduced menu view sent as model context.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MenuContextItem<'a> {
    id: Uuid,
    name: &'a str,
    description: &'a str,
    spice_level: u8,
    flavors: &'a [Uuid],
    price: f64,
    rating: f64,
}

/// Whatever the model sent back; every field is optional and defaulted.
#[derive(Debug, Default, Deserialize)]
struct RawReply {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    recommendations: Option<Vec<String>>,
    #[serde(default)]
    confidence: Option<f32>,
}

impl Recommender {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn recommend(&self, request: &ChatRequest, menu: &[MenuItem]) -> ChatResponse {
        match self.try_recommend(request, menu).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "recommendation call failed, serving fallback");
                fallback(request.language)
            }
        }
    }

    /// The "surprise me" variant: same call with a synthesized message.
    pub async fn surprise(
        &self,
        spice_level: i64,
        flavors: Vec<Uuid>,
        language: Language,
        menu: &[MenuItem],
    ) -> ChatResponse {
        let request = ChatRequest {
            message: surprise_message(language).to_string(),
            spice_level,
            flavors,
            language,
        };
        self.recommend(&request, menu).await
    }

    async fn try_recommend(
        &self,
        request: &ChatRequest,
        menu: &[MenuItem],
    ) -> anyhow::Result<ChatResponse> {
        let user_content = format!(
            "{}\n\n{}",
            user_prompt(request),
            menu_context(menu, request.language)
        );

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": system_prompt(request.language) },
                    { "role": "user", "content": user_content }
                ],
                "response_format": { "type": "json_object" },
                "temperature": 0.7,
                "max_tokens": 1000
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("model API request failed: status {status}, body {body}");
        }

        let reply: Value = response.json().await?;
        if let Some(error) = reply.get("error") {
            anyhow::bail!("model API returned error: {error}");
        }
        let content = reply
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("model reply has no message content"))?;

        let raw: RawReply = serde_json::from_str(content)?;
        Ok(finalize(raw, request.language, menu))
    }
}

/// Applies defaults, clamps confidence and drops recommendation ids that are
/// not part of the menu snapshot.
fn finalize(raw: RawReply, language: Language, menu: &[MenuItem]) -> ChatResponse {
    let menu_ids: HashSet<Uuid> = menu.iter().map(|m| m.id).collect();
    let recommendations = raw
        .recommendations
        .unwrap_or_default()
        .into_iter()
        .filter_map(|id| Uuid::parse_str(&id).ok())
        .filter(|id| menu_ids.contains(id))
        .collect();

    ChatResponse {
        message: raw
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| success_message(language).to_string()),
        recommendations,
        confidence: raw.confidence.unwrap_or(0.8).clamp(0.0, 1.0),
    }
}

pub fn fallback(language: Language) -> ChatResponse {
    ChatResponse {
        message: apology_message(language).to_string(),
        recommendations: Vec::new(),
        confidence: 0.1,
    }
}

fn system_prompt(language: Language) -> &'static str {
    match language {
        Language::Es => {
            "Eres un chef AI experto que ayuda a los usuarios a encontrar la comida perfecta. \
             Analiza sus preferencias y recomienda platos del menú disponible."
        }
        Language::En => {
            "You are an expert AI chef that helps users find perfect food matches. \
             Analyze their preferences and recommend dishes from the available menu."
        }
    }
}

fn user_prompt(request: &ChatRequest) -> String {
    let flavors = request
        .flavors
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    match request.language {
        Language::Es => format!(
            "El usuario dice: \"{}\"\nNivel de picante preferido: {}/5\nSabores preferidos: {}\n\n\
             Basándote en estas preferencias, recomienda platos del menú y proporciona una respuesta útil.\n\
             Responde en formato JSON con esta estructura: \
             {{ \"message\": \"tu respuesta\", \"recommendations\": [\"id1\", \"id2\", \"id3\"], \"confidence\": 0.8 }}",
            request.message, request.spice_level, flavors
        ),
        Language::En => format!(
            "User says: \"{}\"\nPreferred spice level: {}/5\nPreferred flavors: {}\n\n\
             Based on these preferences, recommend dishes from the menu and provide a helpful response.\n\
             Respond in JSON format with this structure: \
             {{ \"message\": \"your response\", \"recommendations\": [\"id1\", \"id2\", \"id3\"], \"confidence\": 0.8 }}",
            request.message, request.spice_level, flavors
        ),
    }
}

fn menu_context(menu: &[MenuItem], language: Language) -> String {
    let reduced: Vec<MenuContextItem<'_>> = menu
        .iter()
        .map(|item| MenuContextItem {
            id: item.id,
            name: item.name.get(language),
            description: item.description.get(language),
            spice_level: item.spice_level,
            flavors: &item.flavors,
            price: item.price,
            rating: item.rating,
        })
        .collect();
    format!(
        "Available menu items: {}",
        serde_json::to_string(&reduced).unwrap_or_else(|_| "[]".into())
    )
}

fn surprise_message(language: Language) -> &'static str {
    match language {
        Language::Es => "Sorpréndeme con algo delicioso",
        Language::En => "Surprise me with something delicious",
    }
}

fn success_message(language: Language) -> &'static str {
    match language {
        Language::Es => "¡Encontré algunas opciones geniales para ti!",
        Language::En => "I found some great options for you!",
    }
}

fn apology_message(language: Language) -> &'static str {
    match language {
        Language::Es => {
            "Lo siento, no pude procesar tu solicitud en este momento. Por favor, intenta de nuevo."
        }
        Language::En => "Sorry, I couldn't process your request right now. Please try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed::demo_dataset;

    fn menu() -> Vec<MenuItem> {
        demo_dataset().menu_items
    }

    #[test]
    fn finalize_applies_defaults() {
        let response = finalize(RawReply::default(), Language::En, &menu());
        assert_eq!(response.message, success_message(Language::En));
        assert!(response.recommendations.is_empty());
        assert_eq!(response.confidence, 0.8);
    }

    #[test]
    fn finalize_clamps_confidence() {
        let high = finalize(
            RawReply {
                confidence: Some(3.5),
                ..RawReply::default()
            },
            Language::En,
            &menu(),
        );
        assert_eq!(high.confidence, 1.0);

        let low = finalize(
            RawReply {
                confidence: Some(-0.4),
                ..RawReply::default()
            },
            Language::En,
            &menu(),
        );
        assert_eq!(low.confidence, 0.0);
    }

    #[test]
    fn finalize_drops_ids_outside_menu_snapshot() {
        let menu = menu();
        let known = menu[0].id;
        let raw = RawReply {
            recommendations: Some(vec![
                known.to_string(),
                Uuid::new_v4().to_string(),
                "not-a-uuid".into(),
            ]),
            ..RawReply::default()
        };
        let response = finalize(raw, Language::Es, &menu);
        assert_eq!(response.recommendations, vec![known]);
    }

    #[test]
    fn fallback_is_localized_apology_with_low_confidence() {
        for language in [Language::En, Language::Es] {
            let response = fallback(language);
            assert!(!response.message.is_empty());
            assert!(response.recommendations.is_empty());
            assert_eq!(response.confidence, 0.1);
        }
        assert_ne!(fallback(Language::En).message, fallback(Language::Es).message);
    }

    #[test]
    fn user_prompt_embeds_preferences() {
        let flavor = Uuid::new_v4();
        let request = ChatRequest {
            message: "something smoky".into(),
            spice_level: 4,
            flavors: vec![flavor],
            language: Language::En,
        };
        let prompt = user_prompt(&request);
        assert!(prompt.contains("something smoky"));
        assert!(prompt.contains("4/5"));
        assert!(prompt.contains(&flavor.to_string()));
    }

    #[test]
    fn menu_context_uses_requested_language() {
        let menu = menu();
        let context = menu_context(&menu, Language::Es);
        assert!(context.contains(&menu[0].name.es));
        assert!(context.contains(&menu[0].id.to_string()));
    }

    #[tokio::test]
    async fn unreachable_endpoint_serves_fallback_not_error() {
        let recommender = Recommender::new(&LlmConfig {
            api_key: "test-key".into(),
            model: "gpt-4o".into(),
            base_url: "http://127.0.0.1:1".into(),
        });
        let request = ChatRequest {
            message: "surprise me".into(),
            spice_level: 0,
            flavors: vec![],
            language: Language::En,
        };
        let response = recommender.recommend(&request, &menu()).await;
        assert_eq!(response.message, apology_message(Language::En));
        assert!(response.recommendations.is_empty());
        assert_eq!(response.confidence, 0.1);
    }
}
