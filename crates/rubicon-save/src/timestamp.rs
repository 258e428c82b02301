//! Preset timestamps.
//!
//! The `DateTime` chunk of a preset stores the same moment twice: a
//! Windows FILETIME (100 ns ticks since 1601-01-01) followed by a
//! bit-packed system time. Both are derived from one civil datetime and
//! round-trip as raw u64 values.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use rubicon_common::BinaryReader;

use crate::Result;

/// Encoded size of a preset timestamp in bytes.
pub const TIMESTAMP_SIZE: usize = 16;

/// A preset timestamp in both of its stored encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetTimestamp {
    /// Windows FILETIME: 100 ns ticks since 1601-01-01 00:00:00.
    pub filetime: u64,
    /// Bit-packed system time (year, millisecond, month, weekday, day,
    /// hour, minute, second).
    pub system_time: u64,
}

impl PresetTimestamp {
    /// Derive both encodings from a civil datetime.
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self {
            filetime: filetime_from(dt),
            system_time: pack_system_time(dt),
        }
    }

    /// Parse from the 16-byte chunk payload.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Ok(Self {
            filetime: reader.read_u64()?,
            system_time: reader.read_u64()?,
        })
    }

    /// Encode to the 16-byte chunk payload.
    pub fn to_bytes(&self) -> [u8; TIMESTAMP_SIZE] {
        let mut out = [0u8; TIMESTAMP_SIZE];
        out[..8].copy_from_slice(&self.filetime.to_le_bytes());
        out[8..].copy_from_slice(&self.system_time.to_le_bytes());
        out
    }

    /// Recover the civil datetime from the FILETIME half.
    ///
    /// Returns `None` for values outside chrono's representable range.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        filetime_epoch().checked_add_signed(TimeDelta::microseconds((self.filetime / 10) as i64))
    }
}

fn filetime_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1601, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn filetime_from(dt: NaiveDateTime) -> u64 {
    let delta = dt - filetime_epoch();
    let micros = delta.num_microseconds().unwrap_or(0).max(0);
    micros as u64 * 10
}

fn pack_system_time(dt: NaiveDateTime) -> u64 {
    let year = dt.year() as u64 & 0xFFF;
    let millisecond = (dt.nanosecond() / 1_000_000) as u64 & 0x3FF;
    let month = dt.month() as u64 & 0xF;
    let weekday = dt.weekday().num_days_from_monday() as u64 & 0x7;
    let day = dt.day() as u64 & 0x1F;
    let hour = dt.hour() as u64 & 0x1F;
    let minute = dt.minute() as u64 & 0x3F;
    let second = dt.second() as u64 & 0x3F;

    year | (millisecond << 12)
        | (month << 22)
        | (weekday << 26)
        | (day << 29)
        | (hour << 34)
        | (minute << 39)
        | (second << 45)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_datetime() -> NaiveDateTime {
        // A Friday.
        NaiveDate::from_ymd_opt(2023, 8, 25)
            .unwrap()
            .and_hms_milli_opt(14, 30, 45, 123)
            .unwrap()
    }

    #[test]
    fn test_bytes_roundtrip() {
        let ts = PresetTimestamp::from_datetime(sample_datetime());
        let parsed = PresetTimestamp::from_bytes(&ts.to_bytes()).unwrap();
        assert_eq!(parsed, ts);
    }

    #[test]
    fn test_filetime_epoch_anchor() {
        // 1601-01-01 itself packs to zero ticks.
        let ts = PresetTimestamp::from_datetime(filetime_epoch());
        assert_eq!(ts.filetime, 0);

        // The unix epoch sits 11644473600 seconds later.
        let unix = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let ts = PresetTimestamp::from_datetime(unix);
        assert_eq!(ts.filetime, 11_644_473_600 * 10_000_000);
    }

    #[test]
    fn test_system_time_fields() {
        let ts = PresetTimestamp::from_datetime(sample_datetime());
        let packed = ts.system_time;

        assert_eq!(packed & 0xFFF, 2023);
        assert_eq!((packed >> 12) & 0x3FF, 123);
        assert_eq!((packed >> 22) & 0xF, 8);
        assert_eq!((packed >> 26) & 0x7, 4); // Friday, Monday = 0
        assert_eq!((packed >> 29) & 0x1F, 25);
        assert_eq!((packed >> 34) & 0x1F, 14);
        assert_eq!((packed >> 39) & 0x3F, 30);
        assert_eq!((packed >> 45) & 0x3F, 45);
    }

    #[test]
    fn test_to_datetime_recovers_filetime_half() {
        let dt = sample_datetime();
        let ts = PresetTimestamp::from_datetime(dt);
        assert_eq!(ts.to_datetime().unwrap(), dt);
    }
}
