//! Payment Authorization Abstraction
//!
//! [`PaymentGateway`] is implemented by [`CardGateway`] and [`UpiGateway`].
//! Both simulate the payment network: after format validation they wait a
//! random latency and approve with a configured probability. This stands in
//! for a real network integration and is not meant to be hardened.

pub mod card;
pub mod registry;
pub mod simulator;
pub mod traits;
pub mod upi;

pub use card::{CardGateway, CARD_GATEWAY};
pub use registry::GatewayRegistry;
pub use simulator::{AlwaysApprove, AlwaysDecline, ApprovalPolicy, RandomApproval};
pub use traits::{
    fields, CredentialPayload, PaymentGateway, PaymentStatus, PaymentTransaction, ValidationResult,
};
pub use upi::{UpiGateway, UPI_GATEWAY};
