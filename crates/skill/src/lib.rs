//! Voice skill that finds a device on the caller's account.
//!
//! Inbound turns are routed to a small selection state machine; the device
//! list travels between turns in session attributes so numbering stays stable
//! and the account is only enumerated once per conversation.

pub mod account;
pub mod directory;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod intent;
pub mod response;
pub mod router;
pub mod session;

#[cfg(test)]
mod test_support;

pub use {
    account::{AccountHandle, AccountService},
    error::{Error, Result},
    response::ResponseEnvelope,
    router::SkillHandler,
    session::DeviceRecord,
};
