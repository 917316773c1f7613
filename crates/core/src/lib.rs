//! MAISYS core: session state, chat flow, and the resilience policies
//! shared by the gateway, its clients, and the directory client.

pub use {
    chat::{ChatController, PendingReply, Responder, Variant},
    clock::{Clock, Sleeper, SystemClock, TokioSleeper},
    conversation::Conversation,
    degraded::{DegradedResponsePolicy, FallbackAnswer, FallbackReason, TemplatePolicy},
    message::{Message, MessageKind},
    retry::{Backoff, RetryError, RetryPolicy, retry},
    session::{Session, SessionStore, UserRole},
    storage::{FileStorage, MemoryStorage, Storage},
};

#[cfg(feature = "testing")]
pub use clock::{FixedClock, RecordingSleeper};

pub mod chat;
pub mod clock;
pub mod conversation;
pub mod degraded;
pub mod message;
pub mod retry;
pub mod session;
pub mod storage;
pub mod utils;
