use crate::error::{Error, Result};

/// Split a `host:port` bootstrap address.
///
/// IPv6 hosts must be bracketed (`[::1]:9092`); the brackets are stripped.
pub fn parse_address(address: &str) -> Result<(String, u16)> {
    let invalid = |reason: &str| Error::InvalidAddress {
        address: address.to_owned(),
        reason: reason.to_owned(),
    };

    let trimmed = address.trim();
    let (host, port) = trimmed
        .rsplit_once(':')
        .ok_or_else(|| invalid("missing port"))?;

    let host = match host.strip_prefix('[') {
        Some(inner) => inner
            .strip_suffix(']')
            .ok_or_else(|| invalid("unterminated IPv6 literal"))?,
        None if host.contains(':') => return Err(invalid("IPv6 hosts must be bracketed")),
        None => host,
    };

    if host.is_empty() {
        return Err(invalid("empty host"));
    }
    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '%' | '.' | '_' | ':'))
    {
        return Err(invalid("invalid character in host"));
    }

    let port = port
        .parse::<u16>()
        .map_err(|e| invalid(&format!("invalid port: {e}")))?;

    Ok((host.to_owned(), port))
}
