pub mod message;
pub mod scheduler;

pub use message::{MAX_CONTENT_LENGTH, MAX_DESTINATION_LENGTH, Message, MessageStatus};
pub use scheduler::{SchedulerInfo, SchedulerStatus};
