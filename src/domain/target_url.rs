use std::{
    fmt::Display,
    net::{Ipv4Addr, Ipv6Addr},
};

use serde::Serialize;
use thiserror::Error;
use url::{Host, Url};

/// Destination of a short code: an absolute http(s) URL pointing at a public host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TargetUrl(String);

#[derive(Error, Debug)]
pub enum TargetUrlParseError {
    #[error("credentials are not allowed in a target URL")]
    ContainsUserinfo,
    #[error("scheme `{0}` is not allowed")]
    WrongScheme(String),
    #[error("host `{0}` is not publicly reachable")]
    BlockedHost(String),
    #[error("URL does not contain a host")]
    EmptyHost,
    #[error("could not parse the URL")]
    Invalid(url::ParseError),
}

impl TargetUrl {
    pub fn parse(input: &str) -> Result<Self, TargetUrlParseError> {
        let url = Url::parse(input).map_err(TargetUrlParseError::Invalid)?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(TargetUrlParseError::WrongScheme(other.to_string())),
        }

        if !url.username().is_empty() || url.password().is_some() {
            return Err(TargetUrlParseError::ContainsUserinfo);
        }

        let public = match url.host() {
            None => return Err(TargetUrlParseError::EmptyHost),
            Some(Host::Domain("")) => return Err(TargetUrlParseError::EmptyHost),
            Some(Host::Domain(name)) => is_public_name(name),
            Some(Host::Ipv4(addr)) => is_public_v4(addr),
            Some(Host::Ipv6(addr)) => is_public_v6(addr),
        };
        if !public {
            let host = url.host_str().unwrap_or_default().to_string();
            return Err(TargetUrlParseError::BlockedHost(host));
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// Single-label names, `localhost` and mDNS names only resolve on the local network
fn is_public_name(name: &str) -> bool {
    let name = name.trim_end_matches('.');
    !name.eq_ignore_ascii_case("localhost") && !name.ends_with(".local") && name.contains('.')
}

fn is_public_v4(addr: Ipv4Addr) -> bool {
    !(addr.is_loopback()
        || addr.is_private()
        || addr.is_link_local()
        || addr.is_unspecified()
        || addr.is_broadcast())
}

fn is_public_v6(addr: Ipv6Addr) -> bool {
    if let Some(v4) = addr.to_ipv4_mapped() {
        return is_public_v4(v4);
    }
    !(addr.is_loopback()
        || addr.is_unspecified()
        || addr.is_unique_local()
        || addr.is_unicast_link_local())
}

impl TryFrom<String> for TargetUrl {
    type Error = TargetUrlParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl Display for TargetUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
