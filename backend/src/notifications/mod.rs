//! Emergency notification fan-out
//!
//! Channel contracts, message composition, the rate gate, and the
//! concurrent dispatcher.

pub mod channels;
pub mod dispatcher;
pub mod message;
pub mod rate_gate;

pub use channels::{DeliveryReceipt, EmailSender, HttpEmailGateway, HttpSmsGateway, SmsSender};
pub use dispatcher::{ChannelAttempt, ChannelKind, ContactDispatchResult, NotificationDispatcher};
pub use message::{AlertMessage, AlertPayload};
pub use rate_gate::{normalize_phone, RateGate};
