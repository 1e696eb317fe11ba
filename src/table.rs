//! Precomputed adjusted-yaw table for saturated stick positions.
//!
//! Built once from a full scan of the raw domain, then read-only. The table
//! answers "which raw stick saturates the adjusted magnitude at (or near)
//! this exact 16-bit angle" without a 65536-point search per query.

use std::io;
use std::num::Wrapping;

use anyhow::Context;
use tracing::debug;

use crate::angle::{truncate_to_hau, Angle, HAU_WIDTH};
use crate::forward::{stick_raw_to_adjusted, RawStick, MAX_ADJUSTED_MAG};
use crate::search::expanding_offsets;
use crate::trig::Trig;

/// Number of 16-bit angle slots.
const TABLE_LEN: usize = 0x10000;

/// Upper bound on expanding-search probes: offsets `0, ±1, ..., ±2048`
/// cover every one of the 4096 HAU buckets.
const MAX_PROBES: usize = 2 * 0x800 + 1;

/// A table mapping adjusted yaws to raw stick values that achieve that yaw
/// with maximum magnitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustedYawTable {
    entries: Vec<Option<RawStick>>,
}

impl AdjustedYawTable {
    /// Build the table from a full scan of the raw stick domain.
    ///
    /// Every raw stick whose adjusted magnitude saturates records itself at
    /// the slot of its adjusted yaw. The scan runs in raster order and later
    /// writes overwrite earlier ones, so each slot holds the *last* raw
    /// stick in raster order achieving that yaw; that choice is part of the
    /// table's observable behavior and is kept stable. Deterministic:
    /// rebuilding from the same trig yields a bit-identical table.
    pub fn build<T: Trig + ?Sized>(trig: &T) -> Self {
        let mut entries = vec![None; TABLE_LEN];
        for raw_stick_x in i8::MIN..=i8::MAX {
            for raw_stick_y in i8::MIN..=i8::MAX {
                let adjusted = stick_raw_to_adjusted(raw_stick_x, raw_stick_y);
                if adjusted.mag >= MAX_ADJUSTED_MAG {
                    let adjusted_yaw = trig.atan2s(-adjusted.y, adjusted.x);
                    let index = adjusted_yaw.0 as u16 as usize;
                    entries[index] = Some(RawStick::new(raw_stick_x, raw_stick_y));
                }
            }
        }

        let table = Self { entries };
        debug!(filled = table.filled(), "adjusted yaw table built");
        table
    }

    /// Number of slots holding a saturated raw stick.
    pub fn filled(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    /// Iterate the filled slots as `(yaw, raw)` pairs in yaw order.
    pub fn entries(&self) -> impl Iterator<Item = (u16, RawStick)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.map(|raw| (index as u16, raw)))
    }

    /// Given a range of adjusted yaws (inclusive-exclusive, wrapping), find
    /// raw stick values that achieve an adjusted yaw in that range with
    /// maximum magnitude.
    pub fn yaw_range_to_raw(&self, start_yaw: Angle, end_yaw: Angle) -> Option<RawStick> {
        let mut yaw = start_yaw;
        while yaw != end_yaw {
            let index = yaw.0 as u16 as usize;
            if let Some(raw) = self.entries[index] {
                return Some(raw);
            }
            yaw += Wrapping(1);
        }
        None
    }

    /// Find a raw stick value with maximum adjusted magnitude whose adjusted
    /// yaw lies in the nearest possible HAU to `target_yaw`, HAUs being
    /// aligned relative to `relative_to`.
    ///
    /// Probes 16-wide windows at bucket offsets `0, -1, +1, -2, +2, ...`
    /// from the target's bucket, so the closest non-empty bucket wins and
    /// equidistant ties resolve to the lower bucket. Always terminates on a
    /// built table; running out of probes means the table has no entries at
    /// all, which is a construction bug.
    pub fn adjusted_yaw_to_raw(&self, target_yaw: Angle, relative_to: Angle) -> RawStick {
        let target_hau_start_yaw = truncate_to_hau(target_yaw - relative_to) + relative_to;

        for offset in expanding_offsets().take(MAX_PROBES) {
            let start_yaw = target_hau_start_yaw + Wrapping((offset as i16).wrapping_mul(HAU_WIDTH));
            let end_yaw = start_yaw + Wrapping(HAU_WIDTH);

            if let Some(raw) = self.yaw_range_to_raw(start_yaw, end_yaw) {
                return raw;
            }
        }

        unreachable!("adjusted yaw table has no saturated entries");
    }

    /// Write the filled slots as CSV (`yaw,raw_x,raw_y`), returning the row
    /// count.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> anyhow::Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(["yaw", "raw_x", "raw_y"])
            .context("Failed to write CSV header")?;

        let mut rows = 0;
        for (yaw, raw) in self.entries() {
            csv_writer
                .write_record([yaw.to_string(), raw.x.to_string(), raw.y.to_string()])
                .with_context(|| format!("Failed to write CSV row for yaw {}", yaw))?;
            rows += 1;
        }

        csv_writer.flush().context("Failed to flush CSV output")?;
        Ok(rows)
    }

    #[cfg(test)]
    pub(crate) fn from_entries(entries: Vec<Option<RawStick>>) -> Self {
        assert_eq!(entries.len(), TABLE_LEN);
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::{angle, hau_index};
    use crate::trig::TableTrig;

    fn sparse_table(slots: &[(u16, RawStick)]) -> AdjustedYawTable {
        let mut entries = vec![None; TABLE_LEN];
        for &(index, raw) in slots {
            entries[index as usize] = Some(raw);
        }
        AdjustedYawTable::from_entries(entries)
    }

    #[test]
    fn test_build_is_deterministic() {
        let trig = TableTrig::generate();
        let first = AdjustedYawTable::build(&trig);
        let second = AdjustedYawTable::build(&trig);
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_records_only_saturated_sticks() {
        let trig = TableTrig::generate();
        let table = AdjustedYawTable::build(&trig);
        assert!(table.filled() > 0);
        for (_, raw) in table.entries() {
            assert_eq!(raw.adjusted().mag, MAX_ADJUSTED_MAG);
        }
    }

    #[test]
    fn test_cardinal_yaws_have_exact_entries() {
        let trig = TableTrig::generate();
        let table = AdjustedYawTable::build(&trig);
        // Full-right, full-up, full-left, full-down adjusted sticks all
        // saturate exactly on a cardinal yaw
        for target in [0x0000u16, 0x4000, 0x8000, 0xC000] {
            let yaw = angle(target as i16);
            let raw = table
                .yaw_range_to_raw(yaw, yaw + Wrapping(1))
                .unwrap_or_else(|| panic!("no saturated stick at {:#06X}", target));
            let adjusted = raw.adjusted();
            assert_eq!(trig.atan2s(-adjusted.y, adjusted.x), yaw);
        }
    }

    #[test]
    fn test_yaw_range_wraps_around() {
        let trig = TableTrig::generate();
        let table = AdjustedYawTable::build(&trig);
        // Scanning across the 0xFFFF -> 0x0000 seam reaches the entry at 0
        let raw = table.yaw_range_to_raw(angle(-16), angle(16));
        assert!(raw.is_some());
        // Empty range scans nothing
        assert_eq!(table.yaw_range_to_raw(angle(100), angle(100)), None);
    }

    #[test]
    fn test_nearest_hau_prefers_exact_bucket() {
        let raw = RawStick::new(57, -57);
        let table = sparse_table(&[(0x2005, raw)]);
        assert_eq!(table.adjusted_yaw_to_raw(angle(0x200F), angle(0)), raw);
    }

    #[test]
    fn test_nearest_hau_tie_breaks_to_lower_bucket() {
        let below = RawStick::new(1, 1);
        let above = RawStick::new(2, 2);
        // Target bucket 0x200 empty; buckets 0x1FF and 0x201 equidistant
        let table = sparse_table(&[(0x1FF8, below), (0x2018, above)]);
        assert_eq!(table.adjusted_yaw_to_raw(angle(0x2004), angle(0)), below);
    }

    #[test]
    fn test_nearest_hau_respects_relative_alignment() {
        let raw = RawStick::new(3, 3);
        let table = sparse_table(&[(0x2002, raw)]);
        // With relative_to = 8 the buckets shift: [0x1FF8, 0x2008) contains
        // the entry and the target, so distance 0 still hits
        assert_eq!(table.adjusted_yaw_to_raw(angle(0x1FFA), angle(8)), raw);
        // Aligned at 0 the same target sits in bucket 0x1FF, one bucket
        // below the entry
        assert_eq!(hau_index(angle(0x1FFA)), 0x1FF);
        assert_eq!(table.adjusted_yaw_to_raw(angle(0x1FFA), angle(0)), raw);
    }

    #[test]
    fn test_every_target_terminates_saturated() {
        let trig = TableTrig::generate();
        let table = AdjustedYawTable::build(&trig);
        for target in 0..=u16::MAX {
            let raw = table.adjusted_yaw_to_raw(angle(target as i16), angle(0));
            assert_eq!(raw.adjusted().mag, MAX_ADJUSTED_MAG, "target {:#06X}", target);
        }
    }

    #[test]
    fn test_write_csv() {
        let raw = RawStick::new(-5, 64);
        let table = sparse_table(&[(16, raw), (0x8000, RawStick::new(7, -7))]);
        let mut out = Vec::new();
        let rows = table.write_csv(&mut out).unwrap();
        assert_eq!(rows, 2);
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("yaw,raw_x,raw_y"));
        assert_eq!(lines.next(), Some("16,-5,64"));
        assert_eq!(lines.next(), Some("32768,7,-7"));
    }
}
