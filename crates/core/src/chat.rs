//! Chat controller.
//!
//! Drives one customer's chat surface: the ordered transcript, the
//! sidebar conversation list, and the send cycle
//! `idle → user message appended → awaiting reply → reply appended → idle`.
//! A send splits into [`ChatController::begin_send`] and
//! [`ChatController::finish`] so the awaiting state is observable; while a
//! reply is pending further sends are refused.

use crate::{
    clock::Clock,
    conversation::{self, Conversation, DEFAULT_TITLE},
    message::Message,
    session::Session,
    storage::{CONVERSATIONS_KEY, Storage},
};
use anyhow::Result;

/// Display name attached to assistant replies.
pub const AGENT_NAME: &str = "MAISYS Client Care";

/// Agent identifier sent upstream with every question.
pub const UPSTREAM_AGENT: &str = "client-care-bot";

/// Shown when the responder fails outright.
pub const APOLOGY: &str =
    "Désolé, je ne peux pas traiter votre demande pour le moment. Veuillez réessayer.";

/// Client segment that receives the discovery quick actions.
pub const DISCOVERY: &str = "discovery";

const DISCOVERY_ACTIONS: &[&str] = &[
    "Découvrir nos services",
    "Ouvrir un compte",
    "Contacter un conseiller",
    "Simuler un crédit",
    "Prendre rendez-vous",
    "Nos avantages",
];

const ACCOUNT_ACTIONS: &[&str] = &[
    "Consulter mes comptes",
    "Effectuer un virement",
    "Demander un relevé",
    "Historique des transactions",
    "Gérer mes cartes",
    "Support technique",
];

/// Answers a customer question on behalf of an agent.
pub trait Responder: Send + Sync {
    /// Ask `agent` the given question and return the reply text.
    fn ask(&self, agent: &str, question: &str) -> impl Future<Output = Result<String>> + Send;
}

impl<T: Responder> Responder for std::sync::Arc<T> {
    fn ask(&self, agent: &str, question: &str) -> impl Future<Output = Result<String>> + Send {
        (**self).ask(agent, question)
    }
}

/// Which face of the chat surface is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Landing view with quick actions.
    Home,
    /// Active transcript.
    Service,
}

/// A question that has been appended and awaits its reply.
#[derive(Debug)]
#[must_use = "a pending reply must be finished to leave the typing state"]
pub struct PendingReply {
    question: String,
    conversation: Option<String>,
}

impl PendingReply {
    /// The question sent upstream.
    pub fn question(&self) -> &str {
        &self.question
    }
}

/// Chat state for one customer.
pub struct ChatController<R, S, C> {
    responder: R,
    storage: S,
    clock: C,
    client_type: Option<String>,
    messages: Vec<Message>,
    conversations: Vec<Conversation>,
    active: Option<String>,
    title: String,
    typing: bool,
    variant: Variant,
}

impl<R: Responder, S: Storage, C: Clock> ChatController<R, S, C> {
    /// Create a controller for `session`.
    ///
    /// Any previously mirrored conversation list is discarded; each
    /// controller starts with an empty sidebar.
    pub fn new(responder: R, storage: S, clock: C, session: Option<&Session>) -> Self {
        if let Err(e) = storage.remove(CONVERSATIONS_KEY) {
            tracing::warn!("failed to clear mirrored conversations: {e}");
        }

        Self {
            responder,
            storage,
            clock,
            client_type: session.and_then(|s| s.client_type.clone()),
            messages: Vec::new(),
            conversations: Vec::new(),
            active: None,
            title: DEFAULT_TITLE.to_owned(),
            typing: false,
            variant: Variant::Home,
        }
    }

    /// Quick actions offered for this customer's segment.
    pub fn quick_actions(&self) -> &'static [&'static str] {
        if self.client_type.as_deref() == Some(DISCOVERY) {
            DISCOVERY_ACTIONS
        } else {
            ACCOUNT_ACTIONS
        }
    }

    /// Append a typed message and enter the awaiting state.
    ///
    /// Returns `None` without touching any state when the text is blank
    /// or a reply is already pending.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingReply> {
        if text.trim().is_empty() || self.typing {
            return None;
        }

        self.variant = Variant::Service;
        if self.title == DEFAULT_TITLE {
            let title = conversation::title_for(text);
            self.open_conversation(title, text);
        }

        Some(self.push_question(text))
    }

    /// Start a fresh conversation from a quick action and enter the
    /// awaiting state. Refused while a reply is pending.
    pub fn begin_quick_action(&mut self, action: &str) -> Option<PendingReply> {
        if self.typing {
            return None;
        }

        self.variant = Variant::Service;
        self.open_conversation(action.to_owned(), action);
        Some(self.push_question(action))
    }

    /// Append the reply (or the apology on failure) and return to idle.
    pub fn finish(&mut self, pending: PendingReply, reply: Result<String>) -> &Message {
        let now = self.clock.now();
        let content = match reply {
            Ok(content) => {
                if let Some(id) = pending.conversation.as_deref()
                    && let Some(conv) = self.conversations.iter_mut().find(|c| c.id == id)
                {
                    conv.last_message = content.clone();
                    conv.timestamp = now;
                    self.mirror();
                }
                content
            }
            Err(e) => {
                tracing::error!("failed to get agent response: {e}");
                APOLOGY.to_owned()
            }
        };

        self.typing = false;
        self.messages.push(Message::agent(AGENT_NAME, content, now));
        &self.messages[self.messages.len() - 1]
    }

    /// Send a typed message and wait for the reply.
    ///
    /// Returns the appended reply, or `None` if the send was refused.
    pub async fn send(&mut self, text: &str) -> Option<&Message> {
        let pending = self.begin_send(text)?;
        let reply = self.responder.ask(UPSTREAM_AGENT, pending.question()).await;
        Some(self.finish(pending, reply))
    }

    /// Run a quick action and wait for the reply.
    pub async fn quick_action(&mut self, action: &str) -> Option<&Message> {
        let pending = self.begin_quick_action(action)?;
        let reply = self.responder.ask(UPSTREAM_AGENT, pending.question()).await;
        Some(self.finish(pending, reply))
    }

    /// Reset to the landing view with an empty transcript.
    pub fn new_conversation(&mut self) {
        self.variant = Variant::Home;
        self.messages.clear();
        self.active = None;
        self.title = DEFAULT_TITLE.to_owned();
    }

    /// Make `id` the active conversation.
    ///
    /// Transcripts are not persisted, so the message list starts empty.
    /// Returns `false` if no such conversation exists.
    pub fn select_conversation(&mut self, id: &str) -> bool {
        let Some(conv) = self.conversations.iter().find(|c| c.id == id) else {
            return false;
        };

        self.title = conv.title.clone();
        self.active = Some(conv.id.clone());
        self.variant = Variant::Service;
        self.messages.clear();
        true
    }

    /// Remove a conversation from the sidebar.
    ///
    /// Deleting the active conversation resets to the landing view.
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let before = self.conversations.len();
        self.conversations.retain(|c| c.id != id);
        if self.conversations.len() == before {
            return false;
        }

        if self.active.as_deref() == Some(id) {
            self.new_conversation();
        }

        self.write_mirror();
        true
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Id of the active conversation.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Title of the current conversation.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether a reply is pending.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    fn open_conversation(&mut self, title: String, text: &str) {
        let conv = Conversation::new(title.clone(), text, self.clock.now());
        self.active = Some(conv.id.clone());
        self.title = title;
        self.conversations.insert(0, conv);
        self.mirror();
    }

    fn push_question(&mut self, text: &str) -> PendingReply {
        self.messages.push(Message::user(text, self.clock.now()));
        self.typing = true;
        PendingReply {
            question: text.to_owned(),
            conversation: self.active.clone(),
        }
    }

    /// Mirror the sidebar into storage when it is non-empty.
    fn mirror(&self) {
        if !self.conversations.is_empty() {
            self.write_mirror();
        }
    }

    fn write_mirror(&self) {
        let result = serde_json::to_string(&self.conversations)
            .map_err(anyhow::Error::from)
            .and_then(|blob| self.storage.set(CONVERSATIONS_KEY, &blob));
        if let Err(e) = result {
            tracing::warn!("failed to mirror conversations: {e}");
        }
    }
}
