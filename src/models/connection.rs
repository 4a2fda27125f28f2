use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Rejected => "rejected",
        }
    }

    /// Parses the answer to a pending request; only terminal states qualify.
    pub fn parse_response(s: &str) -> Option<Self> {
        match s {
            "accepted" => Some(ConnectionStatus::Accepted),
            "rejected" => Some(ConnectionStatus::Rejected),
            _ => None,
        }
    }
}

impl Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ConnectionStatus::Pending),
            other => Self::parse_response(other)
                .ok_or_else(|| format!("unknown connection status: {}", other)),
        }
    }
}

/// A directed request from one user to another
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Connection {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub status: ConnectionStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    pub fn new(from_user_id: Uuid, to_user_id: Uuid, message: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_user_id,
            to_user_id,
            status: ConnectionStatus::Pending,
            message,
            created_at: Utc::now(),
        }
    }

    pub fn involves(&self, user_id: Uuid) -> bool {
        self.from_user_id == user_id || self.to_user_id == user_id
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateConnectionForm {
    pub from_user_id: String,
    pub to_user_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RespondForm {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionsResponse {
    pub connections: Vec<Connection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_connection_is_pending() {
        let connection = Connection::new(Uuid::new_v4(), Uuid::new_v4(), None);
        assert_eq!(connection.status, ConnectionStatus::Pending);
    }

    #[test]
    fn test_only_terminal_states_are_valid_responses() {
        assert_eq!(
            ConnectionStatus::parse_response("accepted"),
            Some(ConnectionStatus::Accepted)
        );
        assert_eq!(
            ConnectionStatus::parse_response("rejected"),
            Some(ConnectionStatus::Rejected)
        );
        assert_eq!(ConnectionStatus::parse_response("pending"), None);
        assert_eq!(ConnectionStatus::parse_response("ACCEPTED"), None);
    }

    #[test]
    fn test_involves_both_directions() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let connection = Connection::new(a, b, Some("hi".to_string()));
        assert!(connection.involves(a));
        assert!(connection.involves(b));
        assert!(!connection.involves(c));
    }
}
