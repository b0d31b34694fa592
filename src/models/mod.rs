pub mod dispatch;
pub mod health;
pub mod liveness;
pub mod message;
pub mod notification;
pub mod provider;
pub mod response;
pub mod validation;
