//! Peer display names from the WireGuard config file
//!
//! Names are carried out-of-band as `# tag_Name` comment lines inside
//! `[Peer]` blocks, immediately before the peer's `PublicKey` line. The
//! table is built once at startup and never revised; a config change
//! requires a restart.

use std::collections::HashMap;
use std::path::Path;

/// Canonical length of a base64-encoded WireGuard public key.
pub const PUBLIC_KEY_LEN: usize = 44;

/// Normalize a public key for lookup: drop all whitespace, then pad with
/// trailing `=` (or truncate) to exactly 44 characters. The config file and
/// `wg show` may disagree on trailing newlines or base64 padding; both sides
/// go through this so they compare equal.
pub fn normalize_public_key(raw: &str) -> String {
    let mut key: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(PUBLIC_KEY_LEN)
        .collect();
    for _ in key.chars().count()..PUBLIC_KEY_LEN {
        key.push('=');
    }
    key
}

/// Normalized public key → display name, read-only after startup.
#[derive(Debug, Clone, Default)]
pub struct PeerNameTable {
    names: HashMap<String, String>,
}

impl PeerNameTable {
    /// Load the table from a wg config file. A missing or unreadable file
    /// yields an empty table; the server still starts and reports no names.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let table = Self::parse(&text);
                tracing::info!("loaded {} peer names from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                tracing::warn!("peer config not readable at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Single linear scan. State is one bool (inside a `[Peer]` block) and
    /// one pending name; later comment lines overwrite earlier ones, and a
    /// name is only recorded when a `PublicKey` line follows in the same
    /// block.
    pub fn parse(text: &str) -> Self {
        let mut names = HashMap::new();
        let mut in_peer_block = false;
        let mut current_name: Option<String> = None;

        for line in text.lines() {
            let line = line.trim();

            if line.starts_with("[Peer]") {
                in_peer_block = true;
                current_name = None;
                continue;
            }

            if !in_peer_block {
                continue;
            }

            if line.starts_with('#') {
                // annotation convention: `# tag_Name`, keep what follows the
                // first underscore
                current_name = line
                    .trim_start_matches('#')
                    .split('_')
                    .nth(1)
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty());
            } else if line.to_lowercase().starts_with("publickey") {
                if let Some(value) = line.splitn(2, '=').nth(1) {
                    if let Some(name) = current_name.take() {
                        names.insert(normalize_public_key(value), name);
                    }
                }
            } else if line.is_empty() || line.starts_with('[') {
                in_peer_block = false;
                current_name = None;
            }
        }

        Self { names }
    }

    /// Display name for a normalized key, empty string when unknown.
    pub fn resolve(&self, normalized_key: &str) -> &str {
        self.names
            .get(normalized_key)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
