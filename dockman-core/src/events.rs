//! Registry events with structured tracing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

use crate::ContainerId;

/// Events emitted by the container registry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// A container collection was built
    Listed {
        /// Number of containers in the "all" listing
        total: usize,
        /// Number flagged as running
        running: usize,
        /// Timestamp
        #[serde(with = "systemtime_serde")]
        timestamp: SystemTime,
    },

    /// A stop command completed successfully
    Stopped {
        /// Container ID
        id: ContainerId,
        /// Timestamp
        #[serde(with = "systemtime_serde")]
        timestamp: SystemTime,
    },

    /// A container was removed
    Removed {
        /// Container ID
        id: ContainerId,
        /// Whether the container had to be stopped first
        forced: bool,
        /// Timestamp
        #[serde(with = "systemtime_serde")]
        timestamp: SystemTime,
    },

    /// Removal was refused because the container is running
    RemovalBlocked {
        /// Container ID
        id: ContainerId,
        /// Timestamp
        #[serde(with = "systemtime_serde")]
        timestamp: SystemTime,
    },
}

impl RegistryEvent {
    /// Get the container ID, if the event concerns a single container
    #[must_use]
    pub const fn container_id(&self) -> Option<&ContainerId> {
        match self {
            Self::Listed { .. } => None,
            Self::Stopped { id, .. } | Self::Removed { id, .. } | Self::RemovalBlocked { id, .. } => {
                Some(id)
            }
        }
    }

    /// Get the timestamp from any event
    #[must_use]
    pub const fn timestamp(&self) -> SystemTime {
        match self {
            Self::Listed { timestamp, .. }
            | Self::Stopped { timestamp, .. }
            | Self::Removed { timestamp, .. }
            | Self::RemovalBlocked { timestamp, .. } => *timestamp,
        }
    }

    /// Emit structured tracing event
    pub fn emit_trace(&self) {
        match self {
            Self::Listed { total, running, .. } => {
                tracing::debug!(total, running, event = "listed", "Containers listed");
            }
            Self::Stopped { id, .. } => {
                tracing::info!(container_id = %id, event = "stopped", "Container stopped");
            }
            Self::Removed { id, forced, .. } => {
                tracing::info!(
                    container_id = %id,
                    forced,
                    event = "removed",
                    "Container removed"
                );
            }
            Self::RemovalBlocked { id, .. } => {
                tracing::warn!(
                    container_id = %id,
                    event = "removal_blocked",
                    "Container is running, removal refused"
                );
            }
        }
    }
}

impl fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listed { total, running, .. } => {
                write!(f, "{total} container(s), {running} running")
            }
            Self::Stopped { id, .. } => write!(f, "Container {id} stopped"),
            Self::Removed { id, forced, .. } => {
                if *forced {
                    write!(f, "Container {id} stopped and removed")
                } else {
                    write!(f, "Container {id} removed")
                }
            }
            Self::RemovalBlocked { id, .. } => write!(f, "Container {id} is running"),
        }
    }
}

// Custom SystemTime serialization
mod systemtime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let since_epoch = time
            .duration_since(UNIX_EPOCH)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_u64(since_epoch.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + std::time::Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_container_id() {
        let id = ContainerId::new("web").unwrap();
        let event = RegistryEvent::Removed {
            id: id.clone(),
            forced: true,
            timestamp: SystemTime::now(),
        };
        assert_eq!(event.container_id(), Some(&id));

        let event = RegistryEvent::Listed {
            total: 2,
            running: 1,
            timestamp: SystemTime::now(),
        };
        assert_eq!(event.container_id(), None);
    }

    #[test]
    fn test_event_display() {
        let id = ContainerId::new("web").unwrap();
        let event = RegistryEvent::Removed {
            id,
            forced: true,
            timestamp: SystemTime::now(),
        };
        assert_eq!(event.to_string(), "Container web stopped and removed");
    }

    #[test]
    fn test_event_serde() {
        let event = RegistryEvent::RemovalBlocked {
            id: ContainerId::new("web").unwrap(),
            timestamp: SystemTime::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"removal_blocked""#));

        let deserialized: RegistryEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event.container_id(), deserialized.container_id());
    }

    #[test]
    fn test_event_timestamp_whole_seconds() {
        let timestamp = std::time::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
        let event = RegistryEvent::Listed {
            total: 3,
            running: 2,
            timestamp,
        };
        assert_eq!(event.timestamp(), timestamp);

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""timestamp":1700000000"#));
        let deserialized: RegistryEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.timestamp(), timestamp);
    }
}
