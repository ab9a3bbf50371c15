//! CIDR openness checks for firewall and security-group style attributes.

use std::net::IpAddr;

use crate::graph::{Attr, Value};

/// True when `s` admits every address: `*`, any CIDR with prefix length 0,
/// or the bare any-address.
pub fn is_open_cidr(s: &str) -> bool {
    let s = s.trim();
    if s == "*" {
        return true;
    }
    match s.split_once('/') {
        Some((addr, prefix)) => {
            addr.parse::<IpAddr>().is_ok() && prefix.trim().parse::<u8>().is_ok_and(|p| p == 0)
        }
        None => s.parse::<IpAddr>().is_ok_and(|ip| ip.is_unspecified()),
    }
}

/// Absent and non-string values are not open. Lists are open when any
/// element is.
pub fn is_open(attr: &Attr<'_>) -> bool {
    attr.value().is_some_and(value_is_open)
}

fn value_is_open(value: &Value) -> bool {
    match value {
        Value::String(s) => is_open_cidr(s),
        Value::List(items) => items.iter().any(value_is_open),
        _ => false,
    }
}
