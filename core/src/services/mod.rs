//! Business services

pub mod delivery;
pub mod otp;
pub mod quota;

pub use delivery::{DeliveryReceipt, DeliverySender};
pub use otp::{IssuedChallenge, OtpService};
pub use quota::{AuthorizedKey, KeyUpdate, QuotaService};
