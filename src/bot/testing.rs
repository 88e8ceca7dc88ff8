//! Recording mocks for router tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use teloxide::utils::command::BotCommands;
use tempfile::TempDir;

use crate::ai::llm::{ChatMessage, CompletionClient, LlmError};
use crate::bot::commands::BotCommand;
use crate::bot::event::{CallbackEvent, ChatScope, Event, IncomingMessage};
use crate::bot::transport::{MemberRole, Moderation, OutgoingMessage, Transport, TransportError};
use crate::bot::AppState;
use crate::config::{AppConfig, DenialPolicy};
use crate::conversation::Conversations;
use crate::store::models::TriggerCase;
use crate::store::ReplyStore;

pub const GROUP_CHAT: i64 = -100_200;
pub const ADMIN: u64 = 1;
pub const MEMBER: u64 = 2;

/// Transport that records everything and answers admin lookups from a table.
#[derive(Default)]
pub struct MockTransport {
    pub sent: Mutex<Vec<OutgoingMessage>>,
    pub answered: Mutex<Vec<String>>,
    pub moderations: Mutex<Vec<(i64, u64, Moderation)>>,
    roles: HashMap<u64, MemberRole>,
    fail_answers: bool,
    fail_sends: bool,
    fail_moderation: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default().with_role(ADMIN, MemberRole::Administrator)
    }

    pub fn with_role(mut self, user_id: u64, role: MemberRole) -> Self {
        self.roles.insert(user_id, role);
        self
    }

    pub fn failing_answers(mut self) -> Self {
        self.fail_answers = true;
        self
    }

    /// Every send is recorded as an attempt, then rejected.
    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn failing_moderation(mut self) -> Self {
        self.fail_moderation = true;
        self
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.text).collect()
    }

    pub fn answered(&self) -> Vec<String> {
        self.answered.lock().unwrap().clone()
    }

    pub fn moderations(&self) -> Vec<(i64, u64, Moderation)> {
        self.moderations.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, message: OutgoingMessage) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(message);
        if self.fail_sends {
            return Err(TransportError::Other("chat not found".into()));
        }
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        self.answered.lock().unwrap().push(callback_id.to_string());
        if self.fail_answers {
            return Err(TransportError::Other("answer rejected".into()));
        }
        Ok(())
    }

    async fn typing(&self, _chat_id: i64) -> Result<(), TransportError> {
        Ok(())
    }

    async fn member_role(&self, _chat_id: i64, user_id: u64) -> Result<MemberRole, TransportError> {
        Ok(self.roles.get(&user_id).copied().unwrap_or(MemberRole::Member))
    }

    async fn moderate(
        &self,
        chat_id: i64,
        user_id: u64,
        action: Moderation,
    ) -> Result<(), TransportError> {
        if self.fail_moderation {
            return Err(TransportError::Other("not enough rights".into()));
        }
        self.moderations.lock().unwrap().push((chat_id, user_id, action));
        Ok(())
    }
}

/// Completion client that returns queued responses
pub struct MockCompletion {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    delay: Option<Duration>,
    /// Record of all requests made
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push_back(Ok(text.to_string()));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Other("no mock response queued".into())))
    }
}

/// App state over a temp replies file. Keep the `TempDir` alive for the test.
pub struct Harness {
    pub state: AppState,
    pub llm: Arc<MockCompletion>,
    _dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(MockCompletion::new(), DenialPolicy::Silent, TriggerCase::Sensitive)
    }

    pub fn build(llm: MockCompletion, denial: DenialPolicy, case: TriggerCase) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let replies_path = dir.path().join("replies.json");
        let config = AppConfig {
            bot_token: "123:test".into(),
            openai_api_key: "sk-test".into(),
            openai_model: "gpt-test".into(),
            openai_base_url: "http://localhost".into(),
            replies_path: replies_path.clone(),
            trigger_case: case,
            completion_timeout: Duration::from_millis(200),
            denial,
        };

        let llm = Arc::new(llm);
        let state = AppState {
            replies: ReplyStore::new(replies_path, config.trigger_case),
            conversations: Conversations::in_memory(),
            llm: llm.clone(),
            config,
        };
        Self {
            state,
            llm,
            _dir: dir,
        }
    }
}

pub fn private_text(user_id: u64, text: &str) -> IncomingMessage {
    IncomingMessage {
        chat_id: user_id as i64,
        scope: ChatScope::Private,
        user_id,
        message_id: 10,
        text: text.to_string(),
        reply_to_user: None,
    }
}

pub fn group_text(user_id: u64, text: &str) -> IncomingMessage {
    IncomingMessage {
        chat_id: GROUP_CHAT,
        scope: ChatScope::Group,
        user_id,
        message_id: 20,
        text: text.to_string(),
        reply_to_user: None,
    }
}

pub fn command(message: IncomingMessage) -> Event {
    let command = BotCommand::parse(&message.text, "reply_bot").expect("test command parses");
    Event::Command { message, command }
}

pub fn button(user_id: u64, data: &str) -> Event {
    Event::Callback(CallbackEvent {
        id: format!("cb-{data}"),
        user_id,
        data: Some(data.to_string()),
    })
}
