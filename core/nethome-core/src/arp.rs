//! Neighbor-table scanning.
//!
//! Parses one snapshot of the kernel neighbor/ARP table (`/proc/net/arp`
//! format) into the subset of configured identities currently resolved and
//! reachable. Each scan re-reads the full table; nothing is cached between
//! calls, so a sample always reflects the table as it was at that instant.

use crate::config::IdentityMap;
use crate::error::{Error, Result};
use crate::provider::PresenceProvider;
use std::fs;
use std::path::{Path, PathBuf};

/// A well-formed table line has exactly this many whitespace-separated fields.
const FIELD_COUNT: usize = 6;

/// Entry state for a complete, reachable neighbor. Everything else
/// (incomplete, failed, stale) is treated as not present.
const FLAG_COMPLETE: &str = "0x2";

/// One row of the neighbor table. Borrowed from the snapshot text; exists
/// only during a single parse pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborEntry<'a> {
    pub ip_address: &'a str,
    pub hw_type: &'a str,
    pub flags: &'a str,
    pub hw_address: &'a str,
    pub mask: &'a str,
    pub device: &'a str,
}

impl<'a> NeighborEntry<'a> {
    /// Splits a line into a neighbor entry. Lines with other than six fields
    /// are not entries and yield `None`.
    fn parse(line: &'a str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != FIELD_COUNT {
            return None;
        }
        Some(Self {
            ip_address: fields[0],
            hw_type: fields[1],
            flags: fields[2],
            hw_address: fields[3],
            mask: fields[4],
            device: fields[5],
        })
    }

    fn is_complete(&self) -> bool {
        self.flags == FLAG_COMPLETE
    }
}

/// Parses neighbor-table text into the configured identities present in it.
///
/// The first line is skipped unconditionally (header). Identities appear in
/// the order their lines appear in the table; no deduplication is performed,
/// so two complete entries mapping to the same identity yield it twice.
pub fn parse_neighbor_table(content: &str, identities: &IdentityMap) -> Vec<String> {
    content
        .lines()
        .skip(1)
        .filter_map(NeighborEntry::parse)
        .filter(NeighborEntry::is_complete)
        .filter_map(|entry| identities.name_for(entry.hw_address))
        .map(str::to_string)
        .collect()
}

/// Presence source backed by a neighbor-table file.
#[derive(Debug, Clone)]
pub struct ArpProvider {
    path: PathBuf,
    identities: IdentityMap,
}

impl ArpProvider {
    pub fn new(path: impl Into<PathBuf>, identities: IdentityMap) -> Self {
        Self {
            path: path.into(),
            identities,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PresenceProvider for ArpProvider {
    /// Reads the table and returns the configured identities found in it.
    ///
    /// Any open or read failure surfaces as [`Error::Source`] and discards
    /// the whole scan; partial results are never returned.
    fn present(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.path).map_err(|source| Error::Source {
            path: self.path.clone(),
            source,
        })?;
        Ok(parse_neighbor_table(&content, &self.identities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "\
IP address       HW type     Flags       HW address            Mask     Device
10.10.10.1      0x1         0x2         00:01:02:03:04:05     *        br0
10.10.11.1      0x1         0x2         00:01:02:03:04:06     *        br1
10.10.12.1      0x1         0x0         00:01:02:03:04:07     *        br2
10.10.13.1      0x1         0x2         00:01:02:03:04:08     *        br2
";

    fn fixture_identities() -> IdentityMap {
        let mut identities = IdentityMap::new();
        identities.insert("00:01:02:03:04:05", "user1");
        identities.insert("00:01:02:03:04:08", "user2");
        identities
    }

    #[test]
    fn fixture_yields_configured_identities_in_table_order() {
        let present = parse_neighbor_table(FIXTURE, &fixture_identities());
        assert_eq!(present, vec!["user1".to_string(), "user2".to_string()]);
    }

    #[test]
    fn header_line_is_skipped_even_if_it_would_match() {
        let content = "\
10.10.10.1 0x1 0x2 00:01:02:03:04:05 * br0
10.10.13.1 0x1 0x2 00:01:02:03:04:08 * br2
";
        let present = parse_neighbor_table(content, &fixture_identities());
        assert_eq!(present, vec!["user2".to_string()]);
    }

    #[test]
    fn lines_with_wrong_field_count_are_excluded() {
        let content = "\
IP address HW type Flags HW address Mask Device
10.10.10.1 0x1 0x2 00:01:02:03:04:05 *
10.10.10.1 0x1 0x2 00:01:02:03:04:05 * br0 extra
";
        let present = parse_neighbor_table(content, &fixture_identities());
        assert!(present.is_empty());
    }

    #[test]
    fn incomplete_entries_are_excluded_even_for_known_addresses() {
        let content = "\
IP address HW type Flags HW address Mask Device
10.10.10.1 0x1 0x0 00:01:02:03:04:05 * br0
10.10.10.2 0x1 0x6 00:01:02:03:04:08 * br0
";
        let present = parse_neighbor_table(content, &fixture_identities());
        assert!(present.is_empty());
    }

    #[test]
    fn duplicate_addresses_yield_duplicate_identities() {
        let content = "\
IP address HW type Flags HW address Mask Device
10.10.10.1 0x1 0x2 00:01:02:03:04:05 * br0
10.10.10.2 0x1 0x2 00:01:02:03:04:05 * wlan0
";
        let present = parse_neighbor_table(content, &fixture_identities());
        assert_eq!(present, vec!["user1".to_string(), "user1".to_string()]);
    }

    #[test]
    fn reparsing_the_same_content_is_idempotent() {
        let identities = fixture_identities();
        let first = parse_neighbor_table(FIXTURE, &identities);
        let second = parse_neighbor_table(FIXTURE, &identities);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_and_header_only_tables_yield_nothing() {
        let identities = fixture_identities();
        assert!(parse_neighbor_table("", &identities).is_empty());
        assert!(parse_neighbor_table("IP address HW type Flags\n", &identities).is_empty());
    }

    #[test]
    fn provider_reads_table_from_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("arp");
        std::fs::write(&path, FIXTURE).expect("write fixture");

        let provider = ArpProvider::new(&path, fixture_identities());
        let present = provider.present().expect("scan table");
        assert_eq!(present, vec!["user1".to_string(), "user2".to_string()]);
    }

    #[test]
    fn missing_table_is_a_source_error() {
        let provider = ArpProvider::new("/nonexistent/arp", fixture_identities());
        let err = provider.present().expect_err("missing table");
        assert!(matches!(err, Error::Source { .. }));
    }
}
