//! `system.*`: sender/creator/transaction introspection, deterministic
//! time, randomness, and account classification (spec §4.11), grounded on
//! `original_source/contract/system_module.c`.

use crate::error::Result;
use host_bignum::Bignum;
use host_vm::{HostDriver, ServiceContext};

pub fn get_sender(driver: &dyn HostDriver) -> u64 {
    driver.sender()
}

pub fn get_creator(driver: &dyn HostDriver, contract: u64) -> Option<u64> {
    driver.creator(contract)
}

pub fn get_txhash(driver: &dyn HostDriver) -> [u8; 32] {
    driver.current_tx_hash()
}

pub fn get_blockheight(driver: &dyn HostDriver) -> u64 {
    driver.current_block_height()
}

/// Deterministic block timestamp, seconds since the Unix epoch
/// (`system.date`/`system.time` share this single source of truth so a
/// contract observing it twice in one call sees the same value).
pub fn get_timestamp(driver: &dyn HostDriver) -> u64 {
    driver.current_block_timestamp()
}

pub fn date(driver: &dyn HostDriver) -> String {
    let secs = get_timestamp(driver);
    format_iso8601(secs)
}

/// `system.date("*t", ...)`: the broken-down table form, matching Lua's
/// `os.date("*t")` field set and `wday` convention (Sunday = 1).
pub fn date_table(driver: &dyn HostDriver) -> host_json::Value {
    use host_json::Value;
    use indexmap::indexmap;

    const SECONDS_PER_DAY: u64 = 86_400;
    let secs = get_timestamp(driver);
    let days_since_epoch = secs / SECONDS_PER_DAY;
    let time_of_day = secs % SECONDS_PER_DAY;
    let (year, month, day) = civil_from_days(days_since_epoch as i64);
    let wday = (days_since_epoch as i64 + 4).rem_euclid(7) + 1;
    let yday = day_of_year(year, month, day);

    Value::object(indexmap! {
        "sec".to_string() => Value::Int((time_of_day % 60) as i64),
        "min".to_string() => Value::Int(((time_of_day % 3600) / 60) as i64),
        "hour".to_string() => Value::Int((time_of_day / 3600) as i64),
        "day".to_string() => Value::Int(day as i64),
        "month".to_string() => Value::Int(month as i64),
        "year".to_string() => Value::Int(year),
        "wday".to_string() => Value::Int(wday),
        "yday".to_string() => Value::Int(yday as i64),
    })
}

pub fn time(driver: &dyn HostDriver) -> u64 {
    get_timestamp(driver)
}

pub fn difftime(end: u64, start: u64) -> i64 {
    end as i64 - start as i64
}

/// Deterministic pseudo-randomness derived from the block's committed
/// random seed — never from a wall-clock or OS source (spec invariant:
/// execution must be reproducible by every validating node).
pub fn random(driver: &dyn HostDriver, ctx: &mut ServiceContext, min: i64, max: i64) -> Result<i64> {
    if max < min {
        return Err(host_vm::HostError::catchable("random range is empty").into());
    }
    ctx.governor().charge_gas(host_config::gas::GAS_CHEAP)?;
    let seed = driver.random_seed();
    let span = (max - min + 1) as u64;
    let offset = if span == 0 { 0 } else { seed % span };
    Ok(min + offset as i64)
}

pub fn is_contract(driver: &dyn HostDriver, account: u64) -> bool {
    driver.is_contract(account)
}

pub fn is_fee_delegation(driver: &dyn HostDriver, account: u64) -> bool {
    driver.is_contract(account) && get_creator(driver, account).is_some()
}

/// Exposed from hardfork ≥ 4 onward.
pub fn to_pubkey(address: &[u8]) -> Vec<u8> {
    address.to_vec()
}

/// Exposed from hardfork ≥ 4 onward.
pub fn to_address(driver: &dyn HostDriver, pubkey: &[u8]) -> [u8; 32] {
    crate::crypto::keccak256(driver, pubkey)
}

/// Exposed from hardfork ≥ 4 onward; reports this host's own version, not
/// the hardfork number.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn balance(driver: &dyn HostDriver, account: u64) -> Bignum {
    driver.balance_of(account)
}

fn format_iso8601(epoch_seconds: u64) -> String {
    const SECONDS_PER_DAY: u64 = 86_400;
    let days_since_epoch = epoch_seconds / SECONDS_PER_DAY;
    let time_of_day = epoch_seconds % SECONDS_PER_DAY;
    let (year, month, day) = civil_from_days(days_since_epoch as i64);
    let hour = time_of_day / 3600;
    let minute = (time_of_day % 3600) / 60;
    let second = time_of_day % 60;
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z")
}

/// Howard Hinnant's days-from-civil algorithm, inverted: converts a day
/// count since the Unix epoch into a proleptic Gregorian (year, month, day).
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// 1-indexed day of year, matching Lua's `os.date("*t").yday`.
fn day_of_year(year: i64, month: u32, day: u32) -> u32 {
    const CUMULATIVE_DAYS: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
    let mut yday = CUMULATIVE_DAYS[(month - 1) as usize] + day;
    if month > 2 && is_leap_year(year) {
        yday += 1;
    }
    yday
}
