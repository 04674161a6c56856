mod format;
mod sink;

pub use sink::{NotificationSink, SlackWebhookSink};

#[cfg(test)]
pub use sink::MockNotificationSink;
