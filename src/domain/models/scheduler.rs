use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerStatus {
    Stopped,
    Running,
}

impl SchedulerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerStatus::Stopped => "stopped",
            SchedulerStatus::Running => "running",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "stopped" => Some(SchedulerStatus::Stopped),
            "running" => Some(SchedulerStatus::Running),
            _ => None,
        }
    }
}

/// Point-in-time view of the scheduler run state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerInfo {
    pub status: SchedulerStatus,
    pub last_tick: Option<DateTime<Utc>>,
    pub next_tick: Option<DateTime<Utc>>,
    pub messages_sent: u64,
    pub interval: Duration,
    pub batch_size: usize,
}

impl SchedulerInfo {
    pub fn is_running(&self) -> bool {
        self.status == SchedulerStatus::Running
    }
}
