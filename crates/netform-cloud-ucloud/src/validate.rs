//! Attribute validators

use netform_cloud::{CloudError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::OnceLock;

/// Tag applied when none is configured
pub const DEFAULT_TAG: &str = "Default";

const MAX_NAME_LEN: usize = 63;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9\p{Han}_.\-]*$").expect("valid name pattern"))
}

/// Names: 1-63 characters of letters, digits, CJK ideographs, `-`, `_`, `.`
pub fn validate_name(attribute: &str, value: &str) -> Result<()> {
    let len = value.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(CloudError::validation(
            attribute,
            format!("expected length between 1 and {MAX_NAME_LEN}, got {len}"),
        ));
    }
    if !name_pattern().is_match(value) {
        return Err(CloudError::validation(
            attribute,
            format!("{value:?} may only contain letters, digits, chinese characters, '-', '_' and '.'"),
        ));
    }
    Ok(())
}

/// Tags: like names, but may be empty
pub fn validate_tag(attribute: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    validate_name(attribute, value)
}

/// Normalize a configured tag the way the remote service stores it
pub fn state_func_tag(value: Option<&str>) -> String {
    match value {
        Some(tag) if !tag.is_empty() => tag.to_string(),
        _ => DEFAULT_TAG.to_string(),
    }
}

/// An IPv4 CIDR block with no host bits set, e.g. `10.0.0.0/8`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CidrBlock {
    network: Ipv4Addr,
    prefix: u8,
}

impl CidrBlock {
    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }
}

impl FromStr for CidrBlock {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            CloudError::validation("cidr_block", format!("{s:?} is not a valid CIDR block: {reason}"))
        };

        let (addr, prefix) = s.split_once('/').ok_or_else(|| invalid("missing prefix length"))?;
        let network: Ipv4Addr = addr.parse().map_err(|_| invalid("bad IPv4 address"))?;
        // decimal digits only, no sign and no leading zero
        let canonical = !prefix.is_empty()
            && prefix.bytes().all(|b| b.is_ascii_digit())
            && (prefix == "0" || !prefix.starts_with('0'));
        if !canonical {
            return Err(invalid("bad prefix length"));
        }
        let prefix: u8 = prefix.parse().map_err(|_| invalid("bad prefix length"))?;
        if prefix > 32 {
            return Err(invalid("prefix length must be at most 32"));
        }

        let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
        if u32::from(network) & !mask != 0 {
            return Err(invalid("host bits are set"));
        }

        Ok(Self { network, prefix })
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

impl Serialize for CidrBlock {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CidrBlock {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
