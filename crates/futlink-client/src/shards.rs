//! Shard selection.
//!
//! The shard directory lists backend partitions in a fixed order. A login
//! uses the first shard whose platform list contains the caller's platform.

use std::collections::BTreeMap;

use crate::error::FutError;
use crate::types::Shard;

/// Select the first shard serving `platform`.
///
/// Matching ignores ASCII case. If `aliases` maps `platform` to another
/// name, shards listing that name are accepted too, but an exact match
/// anywhere in the directory wins over an alias match.
pub fn select_shard<'a>(
    shards: &'a [Shard],
    platform: &str,
    aliases: &BTreeMap<String, String>,
) -> Result<&'a Shard, FutError> {
    if let Some(shard) = first_listing(shards, platform) {
        return Ok(shard);
    }
    let alias = aliases
        .iter()
        .find(|(from, _)| from.eq_ignore_ascii_case(platform))
        .map(|(_, to)| to.as_str());
    alias
        .and_then(|to| first_listing(shards, to))
        .ok_or_else(|| FutError::UnsupportedPlatform(platform.to_string()))
}

fn first_listing<'a>(shards: &'a [Shard], platform: &str) -> Option<&'a Shard> {
    shards
        .iter()
        .find(|s| s.platforms.iter().any(|p| p.eq_ignore_ascii_case(platform)))
}

/// Game SKU for `platform` in game year `version`, e.g. `FFA17XBO` for `xone`.
///
/// Returns `None` for platforms without a known SKU suffix.
pub fn game_sku(version: u32, platform: &str) -> Option<String> {
    let suffix = match platform.to_ascii_lowercase().as_str() {
        "xone" => "XBO",
        "360" | "xbox" => "XBX",
        "ps4" => "PS4",
        "ps3" => "PS3",
        "pc" => "PCC",
        "ios" => "IOS",
        "and" => "AND",
        _ => return None,
    };
    Some(format!("FFA{version}{suffix}"))
}

/// Web app SKU sent with authentication, e.g. `FUT17WEB`.
pub fn web_sku(version: u32) -> String {
    format!("FUT{version}WEB")
}
