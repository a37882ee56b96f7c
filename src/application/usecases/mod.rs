pub mod create_message;
pub mod get_message;
pub mod list_sent_messages;
pub mod message_stats;
pub mod process_pending;
pub mod send_message;
