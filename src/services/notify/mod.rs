/*
 * Responsibility
 * - Moderation notices sent to the notification service
 * - Delivery is best-effort: a failure is logged, never returned to the caller
 */
mod client;
mod dispatcher;
mod notice;

pub use client::{HttpNotificationClient, NotificationSink};
pub use dispatcher::NotificationDispatcher;
pub use notice::{ModerationNotice, NoticeKind};
