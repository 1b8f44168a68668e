use chrono::{DateTime, Utc};
use ninni_llm_api::{GenerateRequest, LlmClient, LlmError};
use ninni_models::Turn;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::PersonaConfig;

/// Conversation handle; holding its lock serializes the turns of one session
pub type SharedConversation = Arc<Mutex<Conversation>>;

/// Server-side history of one chat session
#[derive(Debug)]
pub struct Conversation {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    turns: Vec<Turn>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Send `message` with the whole history and record the exchange
    ///
    /// On failure the history is left exactly as it was before the call.
    pub async fn exchange(
        &mut self,
        client: &dyn LlmClient,
        persona: &PersonaConfig,
        message: &str,
    ) -> Result<String, LlmError> {
        self.turns.push(Turn::user(message));

        let config = persona.generation_config();
        let system_instruction = Some(persona.system_instruction.as_str())
            .filter(|instruction| !instruction.trim().is_empty());
        let request = GenerateRequest {
            system_instruction,
            history: &self.turns,
            config: &config,
        };

        match client.generate(request).await {
            Ok(response) => {
                self.turns.push(Turn::model(response.text.clone()));
                Ok(response.text)
            }
            Err(err) => {
                self.turns.pop();
                Err(err)
            }
        }
    }
}

struct SessionEntry {
    conversation: SharedConversation,
    last_activity: Instant,
}

/// Bounded map from client session ids to conversations
///
/// Holds at most `max_sessions` entries. Inserting into a full store evicts
/// the least recently used entry, and entries idle for longer than
/// `idle_ttl` are dropped on access or by [`SessionManager::purge_expired`].
pub struct SessionManager {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl SessionManager {
    pub fn new(max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
            idle_ttl,
        }
    }

    /// Return the conversation for `session_id`, creating it if needed
    ///
    /// Lookup and insertion happen under one lock, so concurrent first
    /// requests for the same id always share a single conversation.
    pub async fn get_or_create(&self, session_id: &str) -> SharedConversation {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        if let Some(entry) = sessions.get_mut(session_id) {
            if now.duration_since(entry.last_activity) < self.idle_ttl {
                entry.last_activity = now;
                return entry.conversation.clone();
            }
            tracing::debug!(session_id, "Session expired, starting a new conversation");
            sessions.remove(session_id);
        }

        Self::purge_locked(&mut sessions, now, self.idle_ttl);

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_activity)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    tracing::info!(session_id = %id, "Evicted least recently used session");
                }
                None => break,
            }
        }

        let conversation = Arc::new(Mutex::new(Conversation::new()));
        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                conversation: conversation.clone(),
                last_activity: now,
            },
        );
        tracing::debug!(session_id, active = sessions.len(), "Created session");

        conversation
    }

    /// Drop every session idle for longer than the TTL; returns how many went
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        Self::purge_locked(&mut sessions, Instant::now(), self.idle_ttl)
    }

    fn purge_locked(
        sessions: &mut HashMap<String, SessionEntry>,
        now: Instant,
        idle_ttl: Duration,
    ) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_activity) < idle_ttl);
        before - sessions.len()
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.lock().await.contains_key(session_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ninni_llm_api::{BackendType, LlmResponse};
    use ninni_models::Role;

    const TTL: Duration = Duration::from_secs(60);

    struct EchoClient {
        fail: bool,
    }

    #[async_trait]
    impl LlmClient for EchoClient {
        async fn generate(&self, request: GenerateRequest<'_>) -> Result<LlmResponse, LlmError> {
            if self.fail {
                return Err(LlmError::EmptyResponse);
            }
            let last = request.history.last().map(|turn| turn.text.clone()).unwrap_or_default();
            Ok(LlmResponse {
                text: format!("echo {} ({} turns)", last, request.history.len()),
                usage: None,
                finish_reason: None,
            })
        }

        fn backend(&self) -> BackendType {
            BackendType::Gemini
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn same_id_returns_same_conversation() {
        let manager = SessionManager::new(10, TTL);
        let first = manager.get_or_create("a").await;
        let second = manager.get_or_create("a").await;
        let other = manager.get_or_create("b").await;

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(manager.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_first_requests_share_one_conversation() {
        let manager = Arc::new(SessionManager::new(10, TTL));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.get_or_create("race").await })
            })
            .collect();

        let mut conversations = Vec::new();
        for handle in handles {
            conversations.push(handle.await.unwrap());
        }
        assert!(conversations.iter().all(|c| Arc::ptr_eq(c, &conversations[0])));
        assert_eq!(manager.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn full_store_evicts_least_recently_used() {
        let manager = SessionManager::new(2, TTL);
        manager.get_or_create("a").await;
        tokio::time::advance(Duration::from_secs(1)).await;
        manager.get_or_create("b").await;
        tokio::time::advance(Duration::from_secs(1)).await;
        // touching "a" makes "b" the oldest
        manager.get_or_create("a").await;
        tokio::time::advance(Duration::from_secs(1)).await;
        manager.get_or_create("c").await;

        assert_eq!(manager.len().await, 2);
        assert!(manager.contains("a").await);
        assert!(!manager.contains("b").await);
        assert!(manager.contains("c").await);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_session_is_replaced_on_access() {
        let manager = SessionManager::new(10, TTL);
        let before = manager.get_or_create("sleepy").await;
        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        let after = manager.get_or_create("sleepy").await;

        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[tokio::test(start_paused = true)]
    async fn purge_drops_only_idle_sessions() {
        let manager = SessionManager::new(10, TTL);
        manager.get_or_create("old").await;
        tokio::time::advance(Duration::from_secs(45)).await;
        manager.get_or_create("fresh").await;
        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(manager.purge_expired().await, 1);
        assert!(!manager.contains("old").await);
        assert!(manager.contains("fresh").await);
    }

    #[test]
    fn new_conversation_starts_empty_and_stamped() {
        let before = Utc::now();
        let conversation = Conversation::new();
        assert!(conversation.created_at >= before);
        assert!(conversation.turns().is_empty());
    }

    #[tokio::test]
    async fn exchange_records_both_turns() {
        let mut conversation = Conversation::new();
        let persona = PersonaConfig::default();
        let client = EchoClient { fail: false };

        let first = conversation.exchange(&client, &persona, "hello").await.unwrap();
        assert_eq!(first, "echo hello (1 turns)");
        let second = conversation.exchange(&client, &persona, "again").await.unwrap();
        assert_eq!(second, "echo again (3 turns)");

        let roles: Vec<Role> = conversation.turns().iter().map(|turn| turn.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Model, Role::User, Role::Model]);
    }

    #[tokio::test]
    async fn failed_exchange_leaves_history_untouched() {
        let mut conversation = Conversation::new();
        let persona = PersonaConfig::default();

        conversation
            .exchange(&EchoClient { fail: false }, &persona, "hello")
            .await
            .unwrap();
        let err = conversation
            .exchange(&EchoClient { fail: true }, &persona, "lost")
            .await;

        assert!(err.is_err());
        assert_eq!(conversation.turns().len(), 2);
    }
}
