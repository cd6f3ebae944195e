//! Parsing of `wg show all dump` output
//!
//! One tab-separated record per (interface, peer) pair. Field map:
//! 0 interface, 1 public key, 2 preshared key (skipped), 3 endpoint or the
//! `(none)` sentinel, 4 allowed IPs, 5 latest handshake epoch seconds,
//! 6 rx bytes, 7 tx bytes; trailing fields (persistent keepalive) are
//! tolerated and ignored.

use crate::names::{PeerNameTable, normalize_public_key};
use crate::stats::models::{InterfaceSnapshot, PeerStat};
use anyhow::Context;

/// A record needs at least this many fields to describe a peer. Interface
/// header lines in the dump have 5 and fall out here.
const MIN_PEER_FIELDS: usize = 9;

/// Parse the full dump into per-interface peer lists, preserving the dump's
/// interface and peer order. Short records are skipped; a non-numeric
/// counter fails the whole refresh.
pub fn parse_dump(
    output: &str,
    names: &PeerNameTable,
    key_display_len: usize,
) -> anyhow::Result<Vec<(String, InterfaceSnapshot)>> {
    let mut interfaces: Vec<(String, InterfaceSnapshot)> = Vec::new();

    for line in output.trim().lines() {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_PEER_FIELDS {
            continue;
        }

        let raw_key = fields[1];
        let peer = PeerStat {
            public_key: raw_key.chars().take(key_display_len).collect(),
            peer_name: names.resolve(&normalize_public_key(raw_key)).to_string(),
            endpoint: if fields[3] == "(none)" {
                String::new()
            } else {
                fields[3].to_string()
            },
            allowed_ips: fields[4].to_string(),
            latest_handshake: fields[5]
                .parse()
                .with_context(|| format!("bad handshake field: {:?}", fields[5]))?,
            transfer_rx: fields[6]
                .parse()
                .with_context(|| format!("bad rx field: {:?}", fields[6]))?,
            transfer_tx: fields[7]
                .parse()
                .with_context(|| format!("bad tx field: {:?}", fields[7]))?,
        };

        let iface = fields[0];
        match interfaces.iter_mut().find(|(name, _)| name.as_str() == iface) {
            Some((_, snapshot)) => snapshot.peers.push(peer),
            None => interfaces.push((
                iface.to_string(),
                InterfaceSnapshot { peers: vec![peer] },
            )),
        }
    }

    Ok(interfaces)
}
