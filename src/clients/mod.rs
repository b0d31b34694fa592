pub mod email;
pub mod health;
pub mod liveness;
pub mod provider;
pub mod sms;
