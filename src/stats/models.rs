//! HTTP API response models

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One peer's live status as reported by `wg show all dump`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PeerStat {
    /// Public key truncated to the configured display length (raw form,
    /// not the padded lookup form)
    pub public_key: String,
    /// Display name from the config annotation, empty when unknown
    pub peer_name: String,
    /// Remote endpoint, empty when the daemon reports none
    pub endpoint: String,
    pub allowed_ips: String,
    /// Epoch seconds of the latest handshake, 0 when never handshaken
    pub latest_handshake: u64,
    pub transfer_rx: u64,
    pub transfer_tx: u64,
}

/// Peers of one interface, in dump order
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InterfaceSnapshot {
    pub peers: Vec<PeerStat>,
}

/// The full cached payload, replaced wholesale on every refresh
#[derive(Debug, Clone, PartialEq)]
pub enum StatsSnapshot {
    /// Interface name → peers, in first-seen order
    Interfaces(Vec<(String, InterfaceSnapshot)>),
    /// Degraded payload when the underlying query failed
    Error { message: String },
}

impl StatsSnapshot {
    pub fn error() -> Self {
        Self::Error {
            message: "Unable to fetch WireGuard stats".to_string(),
        }
    }
}

// Both variants render as a plain JSON object: interfaces keyed by name, or
// `{"error": "..."}`. Clients tell them apart by shape, not status code.
impl Serialize for StatsSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Interfaces(interfaces) => {
                let mut map = serializer.serialize_map(Some(interfaces.len()))?;
                for (name, interface) in interfaces {
                    map.serialize_entry(name, interface)?;
                }
                map.end()
            }
            Self::Error { message } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", message)?;
                map.end()
            }
        }
    }
}
