pub mod dispatcher;
pub mod payload;

pub use dispatcher::Dispatcher;
pub use payload::NotificationPayload;
