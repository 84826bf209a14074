//! Translation payload handling and the batch field helper.

use futures::future::join_all;
use indexmap::IndexMap;

use crate::core::i18n::Language;

use super::client::Gateway;
use super::error::{GatewayError, GatewayResult};

/// Strip a markdown code fence from raw model output.
///
/// Accepts ```json-fenced, plain ```-fenced, and bare text; anything else is
/// returned untouched for the parse step to reject.
pub fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Pull the per-language map out of a translation response.
///
/// `translations` is normally an object, but the model sometimes hands back
/// its raw fenced-JSON text as a string; that case goes through
/// [`strip_code_fences`] before parsing. Unknown language keys are skipped.
pub(crate) fn parse_translations(
    json: &serde_json::Value,
) -> GatewayResult<IndexMap<Language, String>> {
    let translations = json.get("translations").ok_or_else(|| GatewayError::Parse {
        raw: json.to_string(),
    })?;

    let object = match translations {
        serde_json::Value::Object(map) => map.clone(),
        serde_json::Value::String(text) => {
            match serde_json::from_str::<serde_json::Value>(strip_code_fences(text)) {
                Ok(serde_json::Value::Object(map)) => map,
                _ => {
                    return Err(GatewayError::Parse { raw: text.clone() });
                }
            }
        }
        other => {
            return Err(GatewayError::Parse {
                raw: other.to_string(),
            });
        }
    };

    let mut result = IndexMap::new();
    for (key, value) in object {
        let Ok(lang) = key.parse::<Language>() else {
            log::debug!("Skipping unknown language key in translation response: {key}");
            continue;
        };
        if let Some(translated) = value.as_str() {
            result.insert(lang, translated.to_string());
        }
    }
    Ok(result)
}

/// Translate several named fields concurrently.
///
/// Empty and whitespace-only fields resolve to an empty map without a
/// network call. A field whose translation fails also resolves to an empty
/// map (with a warning log) so the remaining fields still land; the caller
/// keeps whatever subset arrived.
pub async fn translate_fields<G: Gateway + ?Sized>(
    gateway: &G,
    fields: &[(&str, &str)],
    source: Language,
    targets: &[Language],
) -> IndexMap<String, IndexMap<Language, String>> {
    let pending = fields.iter().map(|&(name, text)| async move {
        if text.trim().is_empty() {
            return (name.to_string(), IndexMap::new());
        }
        match gateway.translate(text, source, targets).await {
            Ok(map) => (name.to_string(), map),
            Err(e) => {
                log::warn!("Translation failed for field '{name}': {e}");
                (name.to_string(), IndexMap::new())
            }
        }
    });

    join_all(pending).await.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gateway::client::MockGateway;

    #[test]
    fn test_strip_json_fence() {
        let fenced = "```json\n{\"en\": \"Hello\"}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"en\": \"Hello\"}");
    }

    #[test]
    fn test_strip_plain_fence() {
        let fenced = "```\n{\"en\": \"Hello\"}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"en\": \"Hello\"}");
    }

    #[test]
    fn test_strip_bare_text_untouched() {
        assert_eq!(strip_code_fences("{\"en\": \"Hello\"}"), "{\"en\": \"Hello\"}");
        assert_eq!(strip_code_fences("  plain text  "), "plain text");
    }

    #[test]
    fn test_parse_translations_object_form() {
        let json = serde_json::json!({
            "translations": {"en": "Hello", "ja": "こんにちは"},
            "original": "Xin chào",
        });
        let map = parse_translations(&json).unwrap();
        assert_eq!(map.get(&Language::En).map(String::as_str), Some("Hello"));
        assert_eq!(
            map.get(&Language::Ja).map(String::as_str),
            Some("こんにちは")
        );
    }

    #[test]
    fn test_parse_translations_fenced_string_form() {
        let json = serde_json::json!({
            "translations": "```json\n{\"en\": \"Hello\", \"ko\": \"안녕하세요\"}\n```",
        });
        let map = parse_translations(&json).unwrap();
        assert_eq!(map.get(&Language::En).map(String::as_str), Some("Hello"));
        assert_eq!(
            map.get(&Language::Ko).map(String::as_str),
            Some("안녕하세요")
        );
    }

    #[test]
    fn test_parse_translations_failure_carries_raw() {
        let json = serde_json::json!({"translations": "```json\nnot json at all"});
        match parse_translations(&json) {
            Err(GatewayError::Parse { raw }) => assert!(raw.contains("not json at all")),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_translations_skips_unknown_keys() {
        let json = serde_json::json!({
            "translations": {"en": "Hello", "klingon": "nuqneH", "zh": "你好"},
        });
        let map = parse_translations(&json).unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.contains_key(&Language::En));
        assert!(map.contains_key(&Language::Zh));
    }

    #[test]
    fn test_parse_translations_missing_field() {
        let json = serde_json::json!({"original": "Xin chào"});
        assert!(matches!(
            parse_translations(&json),
            Err(GatewayError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_translate_fields_skips_empty_without_network() {
        // The mock has no expectations, so any call would panic.
        let gateway = MockGateway::new();
        let result = translate_fields(
            &gateway,
            &[("title", ""), ("description", "   ")],
            Language::Vi,
            &[Language::En],
        )
        .await;
        assert_eq!(result.len(), 2);
        assert!(result["title"].is_empty());
        assert!(result["description"].is_empty());
    }

    #[tokio::test]
    async fn test_translate_fields_degrades_per_field() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_translate()
            .withf(|text, _, _| text == "Dịch vụ vận tải")
            .returning(|_, _, _| {
                let mut map = IndexMap::new();
                map.insert(Language::En, "Shipping services".to_string());
                Ok(map)
            });
        gateway
            .expect_translate()
            .withf(|text, _, _| text == "Liên hệ")
            .returning(|_, _, _| Err(GatewayError::Unavailable("down".to_string())));

        let result = translate_fields(
            &gateway,
            &[("title", "Dịch vụ vận tải"), ("cta", "Liên hệ")],
            Language::Vi,
            &[Language::En],
        )
        .await;

        assert_eq!(
            result["title"].get(&Language::En).map(String::as_str),
            Some("Shipping services")
        );
        assert!(result["cta"].is_empty());
    }
}
