//! Delays, in nanoseconds, for [`BrokerConfig::delay`](crate::config::BrokerConfig::delay).

/// Broker actions are delivered immediately.
pub const NOW: u64 = 0;
pub const ONE_NANOSECOND: u64 = 1;
pub const ONE_MICROSECOND: u64 = 1_000 * ONE_NANOSECOND;
pub const ONE_MILLISECOND: u64 = 1_000 * ONE_MICROSECOND;
pub const ONE_SECOND: u64 = 1_000 * ONE_MILLISECOND;
pub const ONE_MINUTE: u64 = 60 * ONE_SECOND;
pub const ONE_HOUR: u64 = 60 * ONE_MINUTE;
pub const ONE_DAY: u64 = 24 * ONE_HOUR;
