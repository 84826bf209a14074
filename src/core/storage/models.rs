//! Data models for the support store.
//!
//! Struct definitions for knowledge entries, knowledge documents, the three
//! settings singletons, and chat transcripts. The `Default` impls carry the
//! hard-coded HAIAN site content that `load_*_settings` merges under whatever
//! the operator has stored; they are the source of truth for "reset to
//! defaults" in the admin views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::i18n::{pick_localized, Language};

// ============================================================================
// Knowledge Base Models
// ============================================================================

/// A single question/answer entry used for substring retrieval.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeItem {
    /// Record ID (SurrealDB record ID without table prefix).
    #[serde(default)]
    pub id: Option<String>,
    pub question: String,
    pub answer: String,
    /// Lowercased keywords, matched as substrings of the user query.
    pub keywords: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl KnowledgeItem {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        keywords: Vec<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            question: question.into(),
            answer: answer.into(),
            keywords,
            category: category.into(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// A long-form knowledge document, concatenated verbatim into the AI context.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeDocument {
    /// Record ID. Documents are keyed by caller-chosen ids (`doc_<millis>`
    /// for new ones) so edits address a stable record.
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl KnowledgeDocument {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            category: category.into(),
            created_at: None,
            updated_at: None,
        }
    }
}

// ============================================================================
// Chatbot Settings (singleton `settings:chatbot`)
// ============================================================================

/// One suggested prompt chip shown under the welcome message.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QuickAction {
    /// Unique within the list; stable across edits.
    pub id: String,
    /// Icon name (the site uses lucide names; the console maps a subset).
    pub icon: String,
    pub label_vi: String,
    pub label_en: String,
    /// The message submitted verbatim when the action is chosen.
    pub prompt: String,
}

impl QuickAction {
    pub fn label(&self, lang: Language) -> &str {
        pick_localized(lang, &self.label_vi, &self.label_en)
    }
}

/// Behavior and copy of the chat assistant. Stored as a partial document;
/// missing fields fall back to these defaults on load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatbotSettings {
    /// System instruction sent with every AI call.
    pub system_instruction: String,
    pub welcome_message_vi: String,
    pub welcome_message_en: String,
    /// Assistant display name in the chat header.
    pub assistant_name: String,
    pub status_text_vi: String,
    pub status_text_en: String,
    /// Ordered list of suggested prompts; empty list shows none.
    pub quick_actions: Vec<QuickAction>,
    pub placeholder_vi: String,
    pub placeholder_en: String,
}

impl ChatbotSettings {
    pub fn welcome_message(&self, lang: Language) -> &str {
        pick_localized(lang, &self.welcome_message_vi, &self.welcome_message_en)
    }

    pub fn status_text(&self, lang: Language) -> &str {
        pick_localized(lang, &self.status_text_vi, &self.status_text_en)
    }

    pub fn placeholder(&self, lang: Language) -> &str {
        pick_localized(lang, &self.placeholder_vi, &self.placeholder_en)
    }
}

impl Default for ChatbotSettings {
    fn default() -> Self {
        Self {
            system_instruction: "Bạn là trợ lý ảo của Công ty cổ phần Vận tải và Xếp dỡ Hải An (HAIAN). \nNhiệm vụ của bạn là hỗ trợ khách hàng về các dịch vụ vận tải biển, tra cứu lịch tàu, theo dõi container và giải đáp thắc mắc.\nHãy trả lời chuyên nghiệp, thân thiện và chính xác.".to_string(),
            welcome_message_vi: "Xin chào! 👋 Tôi là trợ lý ảo hỗ trợ vận tải biển. Tôi có thể giúp bạn tra cứu lịch tàu, theo dõi container, và giải đáp các thắc mắc về dịch vụ. Bạn cần hỗ trợ gì?".to_string(),
            welcome_message_en: "Hello! 👋 I'm a virtual assistant for maritime shipping. I can help you check vessel schedules, track containers, and answer questions about our services. How can I assist you?".to_string(),
            assistant_name: "Maritime Assistant".to_string(),
            status_text_vi: "Hỗ trợ vận tải biển 24/7".to_string(),
            status_text_en: "Maritime support 24/7".to_string(),
            quick_actions: vec![
                QuickAction {
                    id: "1".to_string(),
                    icon: "Ship".to_string(),
                    label_vi: "Tra cứu lịch tàu".to_string(),
                    label_en: "Vessel schedules".to_string(),
                    prompt: "Tôi muốn tra cứu lịch tàu".to_string(),
                },
                QuickAction {
                    id: "2".to_string(),
                    icon: "Container".to_string(),
                    label_vi: "Theo dõi container".to_string(),
                    label_en: "Track container".to_string(),
                    prompt: "Tôi muốn theo dõi container".to_string(),
                },
                QuickAction {
                    id: "3".to_string(),
                    icon: "Globe".to_string(),
                    label_vi: "Tuyến đường biển".to_string(),
                    label_en: "Shipping routes".to_string(),
                    prompt: "Cho tôi biết về các tuyến đường biển".to_string(),
                },
                QuickAction {
                    id: "4".to_string(),
                    icon: "HelpCircle".to_string(),
                    label_vi: "Câu hỏi thường gặp".to_string(),
                    label_en: "FAQ".to_string(),
                    prompt: "Các câu hỏi thường gặp".to_string(),
                },
            ],
            placeholder_vi: "Nhập câu hỏi của bạn...".to_string(),
            placeholder_en: "Type your question...".to_string(),
        }
    }
}

// ============================================================================
// Hero Settings (singleton `settings:hero`)
// ============================================================================

/// One feature bullet in the hero section.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HeroFeature {
    pub id: String,
    pub icon: String,
    pub text_vi: String,
    pub text_en: String,
}

impl HeroFeature {
    pub fn text(&self, lang: Language) -> &str {
        pick_localized(lang, &self.text_vi, &self.text_en)
    }
}

/// Editable copy of the landing hero section.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeroSettings {
    pub badge_vi: String,
    pub badge_en: String,
    pub title_vi: String,
    pub title_en: String,
    pub title_highlight_vi: String,
    pub title_highlight_en: String,
    pub description_vi: String,
    pub description_en: String,
    /// Feature bullets, capped at [`MAX_HERO_FEATURES`] by the editor.
    pub features: Vec<HeroFeature>,
}

/// Editor cap on hero feature bullets.
pub const MAX_HERO_FEATURES: usize = 5;

/// Editor cap on landing service cards.
pub const MAX_SERVICE_CARDS: usize = 6;

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            badge_vi: "Hỗ trợ khách hàng thông minh".to_string(),
            badge_en: "Smart Customer Support".to_string(),
            title_vi: "Trợ lý ảo".to_string(),
            title_en: "Virtual Assistant for".to_string(),
            title_highlight_vi: "Vận tải biển".to_string(),
            title_highlight_en: "Maritime Shipping".to_string(),
            description_vi: "Chatbot AI hỗ trợ khách hàng 24/7 về lịch tàu, theo dõi container, và các dịch vụ vận tải biển của HAIAN.".to_string(),
            description_en: "AI chatbot supporting customers 24/7 with vessel schedules, container tracking, and HAIAN maritime services.".to_string(),
            features: vec![
                HeroFeature {
                    id: "1".to_string(),
                    icon: "MessageCircle".to_string(),
                    text_vi: "Trả lời tức thì".to_string(),
                    text_en: "Instant response".to_string(),
                },
                HeroFeature {
                    id: "2".to_string(),
                    icon: "Clock".to_string(),
                    text_vi: "Hoạt động 24/7".to_string(),
                    text_en: "Available 24/7".to_string(),
                },
                HeroFeature {
                    id: "3".to_string(),
                    icon: "Ship".to_string(),
                    text_vi: "Tra cứu lịch tàu".to_string(),
                    text_en: "Vessel schedules".to_string(),
                },
                HeroFeature {
                    id: "4".to_string(),
                    icon: "Container".to_string(),
                    text_vi: "Theo dõi container".to_string(),
                    text_en: "Track containers".to_string(),
                },
                HeroFeature {
                    id: "5".to_string(),
                    icon: "Globe".to_string(),
                    text_vi: "Hỗ trợ đa ngôn ngữ".to_string(),
                    text_en: "Multi-language support".to_string(),
                },
            ],
        }
    }
}

// ============================================================================
// Landing Settings (singleton `settings:landing`)
// ============================================================================

/// One card in the landing services grid.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceCard {
    pub id: String,
    pub icon: String,
    pub title_vi: String,
    pub title_en: String,
    pub description_vi: String,
    pub description_en: String,
}

impl ServiceCard {
    pub fn title(&self, lang: Language) -> &str {
        pick_localized(lang, &self.title_vi, &self.title_en)
    }

    pub fn description(&self, lang: Language) -> &str {
        pick_localized(lang, &self.description_vi, &self.description_en)
    }
}

/// The landing services section.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServicesSettings {
    pub title_vi: String,
    pub title_en: String,
    pub description_vi: String,
    pub description_en: String,
    /// Service cards, capped at [`MAX_SERVICE_CARDS`] by the editor.
    pub cards: Vec<ServiceCard>,
}

impl Default for ServicesSettings {
    fn default() -> Self {
        Self {
            title_vi: "Chúng tôi có thể hỗ trợ bạn".to_string(),
            title_en: "How We Can Help You".to_string(),
            description_vi: "Trợ lý ảo HAIAN được thiết kế để giải đáp mọi thắc mắc của bạn về dịch vụ vận tải biển.".to_string(),
            description_en: "HAIAN Virtual Assistant is designed to answer all your questions about maritime shipping services.".to_string(),
            cards: vec![
                ServiceCard {
                    id: "1".to_string(),
                    icon: "Ship".to_string(),
                    title_vi: "Thông tin lịch tàu".to_string(),
                    title_en: "Vessel Schedules".to_string(),
                    description_vi: "Tra cứu lịch trình tàu, thời gian khởi hành và cập cảng.".to_string(),
                    description_en: "Look up vessel schedules, departure times and port arrivals.".to_string(),
                },
                ServiceCard {
                    id: "2".to_string(),
                    icon: "Container".to_string(),
                    title_vi: "Theo dõi container".to_string(),
                    title_en: "Container Tracking".to_string(),
                    description_vi: "Kiểm tra trạng thái và vị trí container theo thời gian thực.".to_string(),
                    description_en: "Check container status and location in real-time.".to_string(),
                },
                ServiceCard {
                    id: "3".to_string(),
                    icon: "Headphones".to_string(),
                    title_vi: "Hỗ trợ khách hàng".to_string(),
                    title_en: "Customer Support".to_string(),
                    description_vi: "Giải đáp thắc mắc về dịch vụ và báo giá.".to_string(),
                    description_en: "Answer questions about services and quotes.".to_string(),
                },
            ],
        }
    }
}

/// The landing call-to-action section.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CtaSettings {
    pub title_vi: String,
    pub title_en: String,
    pub description_vi: String,
    pub description_en: String,
    pub languages_text_vi: String,
    pub languages_text_en: String,
}

impl Default for CtaSettings {
    fn default() -> Self {
        Self {
            title_vi: "Bắt đầu trò chuyện ngay".to_string(),
            title_en: "Start Chatting Now".to_string(),
            description_vi: "Nhấn vào biểu tượng chat ở góc phải màn hình để bắt đầu trò chuyện với trợ lý ảo HAIAN.".to_string(),
            description_en: "Click the chat icon in the bottom right corner to start chatting with HAIAN virtual assistant.".to_string(),
            languages_text_vi: "Hỗ trợ tiếng Việt, English, 中文, 한국어, 日本語".to_string(),
            languages_text_en: "Supporting Vietnamese, English, Chinese, Korean, Japanese".to_string(),
        }
    }
}

/// Editable copy of the landing page below the hero. Merged section-wise:
/// a stored document replaces `services` fields independently of `cta` fields.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LandingSettings {
    pub services: ServicesSettings,
    pub cta: CtaSettings,
}

// ============================================================================
// Chat Transcript Models
// ============================================================================

/// One chat bubble, persisted best-effort after each turn.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    pub is_bot: bool,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatMessage {
    pub fn from_user(content: impl Into<String>, user_id: &str, session_id: &str) -> Self {
        Self::turn(content, false, user_id, session_id)
    }

    pub fn from_bot(content: impl Into<String>, user_id: &str, session_id: &str) -> Self {
        Self::turn(content, true, user_id, session_id)
    }

    fn turn(content: impl Into<String>, is_bot: bool, user_id: &str, session_id: &str) -> Self {
        Self {
            id: None,
            content: content.into(),
            is_bot,
            timestamp: Some(Utc::now()),
            user_id: Some(user_id.to_string()),
            session_id: if session_id.is_empty() {
                None
            } else {
                Some(session_id.to_string())
            },
        }
    }
}

/// One widget session, from open to rating.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatSession {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message_count: i64,
    /// 1 to 5 stars, merged on when the user rates post-hoc.
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// A submitted session rating. Kept as its own record so re-rating a session
/// stays auditable.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatRating {
    #[serde(default)]
    pub id: Option<String>,
    pub session_id: String,
    pub rating: u8,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chatbot_defaults_are_complete() {
        let defaults = ChatbotSettings::default();
        assert!(defaults.system_instruction.contains("HAIAN"));
        assert_eq!(defaults.assistant_name, "Maritime Assistant");
        assert_eq!(defaults.quick_actions.len(), 4);
        assert_eq!(defaults.quick_actions[0].prompt, "Tôi muốn tra cứu lịch tàu");

        // Quick action ids are unique
        let mut ids: Vec<_> = defaults.quick_actions.iter().map(|a| &a.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), defaults.quick_actions.len());
    }

    #[test]
    fn test_localized_field_helpers() {
        let defaults = ChatbotSettings::default();
        assert!(defaults.welcome_message(Language::Vi).starts_with("Xin chào!"));
        assert!(defaults.welcome_message(Language::En).starts_with("Hello!"));
        // Languages without dedicated copy fall back to English
        assert!(defaults.welcome_message(Language::Ja).starts_with("Hello!"));
        assert_eq!(defaults.placeholder(Language::Vi), "Nhập câu hỏi của bạn...");
    }

    #[test]
    fn test_hero_defaults_respect_cap() {
        let defaults = HeroSettings::default();
        assert!(defaults.features.len() <= MAX_HERO_FEATURES);
        assert_eq!(defaults.title_highlight_en, "Maritime Shipping");
    }

    #[test]
    fn test_landing_defaults_per_section() {
        let defaults = LandingSettings::default();
        assert_eq!(defaults.services.cards.len(), 3);
        assert!(defaults.services.cards.len() <= MAX_SERVICE_CARDS);
        assert_eq!(defaults.cta.title_en, "Start Chatting Now");
        assert!(defaults.cta.languages_text_vi.contains("日本語"));
    }

    #[test]
    fn test_partial_settings_deserialize_with_defaults() {
        // A stored document carrying only one field decodes with all other
        // fields taken from Default, which is what load() relies on.
        let partial: ChatbotSettings =
            serde_json::from_str(r#"{"assistant_name":"HaiAn Bot"}"#).unwrap();
        assert_eq!(partial.assistant_name, "HaiAn Bot");
        assert_eq!(partial.placeholder_vi, ChatbotSettings::default().placeholder_vi);
    }

    #[test]
    fn test_chat_message_constructors() {
        let msg = ChatMessage::from_user("xin chào", "console", "abc123");
        assert!(!msg.is_bot);
        assert_eq!(msg.session_id.as_deref(), Some("abc123"));
        assert!(msg.timestamp.is_some());

        // Empty session id (session start failed) is stored as absent
        let msg = ChatMessage::from_bot("chào bạn", "console", "");
        assert!(msg.is_bot);
        assert!(msg.session_id.is_none());
    }
}
