//! Chat transcripts, sessions, ratings, and the analytics aggregation.
//!
//! Everything on the live chat path is best-effort: a failed write logs and
//! returns, because losing a transcript row must never break the
//! conversation. Analytics reads the full collections and aggregates
//! client-side; there is no server-side query beyond simple filters.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::error::StoreError;
use super::models::{ChatMessage, ChatRating, ChatSession};

// ============================================================================
// Transcript Writes
// ============================================================================

/// Persist one chat bubble. Best-effort: failures are logged and swallowed.
pub async fn save_chat_message(db: &Surreal<Db>, message: &ChatMessage) {
    let result = db
        .query(
            r#"
            CREATE chat_message CONTENT {
                content: $content,
                is_bot: $is_bot,
                timestamp: $timestamp ?? time::now(),
                user_id: $user_id,
                session_id: $session_id
            };
        "#,
        )
        .bind(("content", message.content.clone()))
        .bind(("is_bot", message.is_bot))
        .bind(("timestamp", message.timestamp))
        .bind(("user_id", message.user_id.clone()))
        .bind(("session_id", message.session_id.clone()))
        .await;

    if let Err(e) = result {
        log::error!(
            "Failed to save chat message (session {:?}): {e}",
            message.session_id
        );
    }
}

/// Transcript for one operator id, oldest first. A read failure logs and
/// yields an empty history so the widget still opens.
pub async fn chat_history(db: &Surreal<Db>, user_id: &str) -> Vec<ChatMessage> {
    let result: Result<Vec<ChatMessage>, StoreError> = async {
        let messages: Vec<ChatMessage> = db
            .query(
                "SELECT *, meta::id(id) as id FROM chat_message \
                 WHERE user_id = $user_id ORDER BY timestamp ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(messages)
    }
    .await;

    match result {
        Ok(messages) => messages,
        Err(e) => {
            log::error!("Failed to load chat history for {user_id}: {e}");
            Vec::new()
        }
    }
}

// ============================================================================
// Session Lifecycle
// ============================================================================

/// Open a new session record and return its id.
///
/// Returns an empty string on failure; callers keep the chat working without
/// session tracking in that case.
pub async fn start_session(db: &Surreal<Db>, user_id: &str, user_agent: &str) -> String {
    #[derive(Debug, Deserialize)]
    struct CreatedRecord {
        id: surrealdb::sql::Thing,
    }

    let result: Result<Option<CreatedRecord>, StoreError> = async {
        let record: Option<CreatedRecord> = db
            .query(
                r#"
                CREATE chat_session CONTENT {
                    started_at: time::now(),
                    message_count: 0,
                    user_id: $user_id,
                    user_agent: $user_agent
                };
            "#,
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("user_agent", user_agent.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(record)
    }
    .await;

    match result {
        Ok(Some(record)) => record.id.id.to_string(),
        Ok(None) => {
            log::error!("Session create returned no record");
            String::new()
        }
        Err(e) => {
            log::error!("Failed to start chat session: {e}");
            String::new()
        }
    }
}

/// Close a session with its final message count. No-op for the empty id.
pub async fn end_session(db: &Surreal<Db>, session_id: &str, message_count: i64) {
    if session_id.is_empty() {
        return;
    }

    let result = db
        .query(
            r#"
            UPDATE type::thing('chat_session', $id) MERGE {
                ended_at: time::now(),
                message_count: $count
            };
        "#,
        )
        .bind(("id", session_id.to_string()))
        .bind(("count", message_count))
        .await;

    if let Err(e) = result {
        log::error!("Failed to end chat session {session_id}: {e}");
    }
}

/// Record a 1-5 star rating with optional feedback. Writes a rating record
/// and, when the session id is known, merges the rating onto the session so
/// the analytics table shows it inline. Best-effort on both writes.
pub async fn submit_rating(
    db: &Surreal<Db>,
    session_id: &str,
    rating: u8,
    feedback: Option<&str>,
) {
    let feedback_owned = feedback.map(|f| f.to_string());

    let result = db
        .query(
            r#"
            CREATE chat_rating CONTENT {
                session_id: $session_id,
                rating: $rating,
                feedback: $feedback,
                created_at: time::now()
            };
        "#,
        )
        .bind(("session_id", session_id.to_string()))
        .bind(("rating", rating as i64))
        .bind(("feedback", feedback_owned.clone()))
        .await;

    if let Err(e) = result {
        log::error!("Failed to submit rating for session {session_id}: {e}");
        return;
    }

    if session_id.is_empty() {
        return;
    }

    let result = db
        .query("UPDATE type::thing('chat_session', $id) MERGE { rating: $rating, feedback: $feedback }")
        .bind(("id", session_id.to_string()))
        .bind(("rating", rating as i64))
        .bind(("feedback", feedback_owned))
        .await;

    if let Err(e) = result {
        log::error!("Failed to merge rating onto session {session_id}: {e}");
    }
}

/// All sessions, most recent first (analytics table order).
pub async fn list_sessions(db: &Surreal<Db>) -> Result<Vec<ChatSession>, StoreError> {
    let sessions: Vec<ChatSession> = db
        .query("SELECT *, meta::id(id) as id FROM chat_session ORDER BY started_at DESC")
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?
        .take(0)
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(sessions)
}

// ============================================================================
// Analytics Aggregation
// ============================================================================

/// Aggregated chat statistics for the admin analytics view.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatAnalytics {
    pub total_sessions: usize,
    pub total_messages: usize,
    /// Mean of all submitted ratings; 0.0 when none exist.
    pub average_rating: f64,
    pub average_messages_per_session: f64,
    /// Count per star, index 0 = one star.
    pub rating_distribution: [usize; 5],
    /// One bucket per day of the requested window, oldest first.
    pub daily: Vec<DailyStats>,
}

/// Session and message counts for one calendar day (UTC).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub sessions: usize,
    pub messages: usize,
}

/// Aggregate sessions, transcripts, and ratings client-side.
///
/// `daily` covers exactly the last `days` calendar days ending today, with
/// zero-filled buckets for quiet days. Totals and the rating figures span the
/// whole collections.
pub async fn chat_analytics(db: &Surreal<Db>, days: i64) -> Result<ChatAnalytics, StoreError> {
    let sessions = list_sessions(db).await?;

    let messages: Vec<ChatMessage> = db
        .query("SELECT *, meta::id(id) as id FROM chat_message")
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?
        .take(0)
        .map_err(|e| StoreError::Query(e.to_string()))?;

    let ratings: Vec<ChatRating> = db
        .query("SELECT *, meta::id(id) as id FROM chat_rating")
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?
        .take(0)
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(aggregate(
        &sessions,
        &messages,
        &ratings,
        days,
        Utc::now().date_naive(),
    ))
}

/// Pure aggregation over already-loaded records. `today` is the last day of
/// the daily window.
pub fn aggregate(
    sessions: &[ChatSession],
    messages: &[ChatMessage],
    ratings: &[ChatRating],
    days: i64,
    today: NaiveDate,
) -> ChatAnalytics {
    let days = days.max(1);
    let window_start = today - Duration::days(days - 1);

    let mut daily: Vec<DailyStats> = (0..days)
        .map(|offset| DailyStats {
            date: window_start + Duration::days(offset),
            sessions: 0,
            messages: 0,
        })
        .collect();

    let bucket_index = |date: NaiveDate| -> Option<usize> {
        if date < window_start || date > today {
            return None;
        }
        Some((date - window_start).num_days() as usize)
    };

    for session in sessions {
        if let Some(idx) = session
            .started_at
            .map(|t| t.date_naive())
            .and_then(bucket_index)
        {
            daily[idx].sessions += 1;
        }
    }

    for message in messages {
        if let Some(idx) = message
            .timestamp
            .map(|t| t.date_naive())
            .and_then(bucket_index)
        {
            daily[idx].messages += 1;
        }
    }

    let mut rating_distribution = [0usize; 5];
    let mut rating_sum = 0u64;
    let mut rating_count = 0u64;
    for rating in ratings {
        if (1..=5).contains(&rating.rating) {
            rating_distribution[(rating.rating - 1) as usize] += 1;
            rating_sum += rating.rating as u64;
            rating_count += 1;
        }
    }

    let average_rating = if rating_count > 0 {
        rating_sum as f64 / rating_count as f64
    } else {
        0.0
    };

    let average_messages_per_session = if sessions.is_empty() {
        0.0
    } else {
        messages.len() as f64 / sessions.len() as f64
    };

    ChatAnalytics {
        total_sessions: sessions.len(),
        total_messages: messages.len(),
        average_rating,
        average_messages_per_session,
        rating_distribution,
        daily,
    }
}
