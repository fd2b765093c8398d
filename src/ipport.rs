//! `host[:port]` string parsing.
//!
//! Accepts the forms people actually write in config files: a bare IP
//! (`127.0.0.1`, `::1`), IP plus port (`127.0.0.1:80`, `[::1]:80`), a
//! bracketed IPv6 without port (`[::1]`), and a port alone (`:80`).

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// An IP address and/or port parsed from a string; either half may be
/// absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpPort {
    /// The address, when the input contained one.
    pub ip: Option<IpAddr>,
    /// The port, when the input contained one.
    pub port: Option<u16>,
}

impl IpPort {
    /// Fills in the blanks: unspecified 0.0.0.0 when the address is absent,
    /// port 0 when the port is absent.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = self
            .ip
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        SocketAddr::new(ip, self.port.unwrap_or(0))
    }
}

impl fmt::Display for IpPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.ip, self.port) {
            (Some(IpAddr::V6(ip)), Some(port)) => write!(f, "[{ip}]:{port}"),
            (Some(ip), Some(port)) => write!(f, "{ip}:{port}"),
            (Some(IpAddr::V6(ip)), None) => write!(f, "[{ip}]"),
            (Some(ip), None) => write!(f, "{ip}"),
            (None, Some(port)) => write!(f, ":{port}"),
            (None, None) => Ok(()),
        }
    }
}

/// Parses an IP with, optionally, a port.
///
/// Returns `None` for anything that is not an IP, a bracketed IPv6, or a
/// `:port` with a valid decimal port number.
#[must_use]
pub fn parse_ip_port(input: &str) -> Option<IpPort> {
    // Can't parse something that small.
    if input.len() < 2 {
        return None;
    }

    if let Some(rest) = input.strip_prefix('[') {
        let close = rest.find(']')?;
        let ip: IpAddr = rest[..close].parse().ok()?;
        let tail = &rest[close + 1..];
        if tail.is_empty() {
            return Some(IpPort {
                ip: Some(ip),
                port: None,
            });
        }
        let port: u16 = tail.strip_prefix(':')?.parse().ok()?;
        return Some(IpPort {
            ip: Some(ip),
            port: Some(port),
        });
    }

    match input.rfind(':') {
        // No colon at all: must be a bare IPv4.
        None => {
            let ip: IpAddr = input.parse().ok()?;
            Some(IpPort {
                ip: Some(ip),
                port: None,
            })
        }
        // Leading colon: port only.
        Some(0) => {
            let port: u16 = input[1..].parse().ok()?;
            Some(IpPort {
                ip: None,
                port: Some(port),
            })
        }
        Some(pos) => {
            if let Ok(ip) = input[..pos].parse::<IpAddr>() {
                let port: u16 = input[pos + 1..].parse().ok()?;
                Some(IpPort {
                    ip: Some(ip),
                    port: Some(port),
                })
            } else {
                // The colon belonged to a bare IPv6 address.
                let ip: IpAddr = input.parse().ok()?;
                Some(IpPort {
                    ip: Some(ip),
                    port: None,
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parsed(input: &str) -> IpPort {
        parse_ip_port(input).unwrap_or_else(|| panic!("expected {input:?} to parse"))
    }

    #[test]
    fn test_ipv4_with_port() {
        let result = parsed("127.0.0.1:80");
        assert_eq!(result.to_string(), "127.0.0.1:80");
        assert_eq!(result.socket_addr(), "127.0.0.1:80".parse().unwrap());
    }

    #[test]
    fn test_ipv6_with_port() {
        let result = parsed("[::1]:80");
        assert_eq!(result.to_string(), "[::1]:80");
        assert_eq!(result.socket_addr(), "[::1]:80".parse().unwrap());
    }

    #[test]
    fn test_port_only() {
        let result = parsed(":80");
        assert_eq!(result.ip, None);
        assert_eq!(result.port, Some(80));
        assert_eq!(result.to_string(), ":80");
    }

    #[test]
    fn test_ipv4_only() {
        let result = parsed("127.0.0.1");
        assert_eq!(result.port, None);
        assert_eq!(result.to_string(), "127.0.0.1");
        assert_eq!(result.socket_addr().port(), 0);
    }

    #[test]
    fn test_bare_ipv6() {
        let result = parsed("::1");
        assert_eq!(result.ip, Some("::1".parse().unwrap()));
        assert_eq!(result.port, None);
    }

    #[test]
    fn test_bracketed_ipv6_no_port() {
        let result = parsed("[2001:db8::1]");
        assert_eq!(result.ip, Some("2001:db8::1".parse().unwrap()));
        assert_eq!(result.port, None);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(parse_ip_port("").is_none());
        assert!(parse_ip_port("x").is_none());
        assert!(parse_ip_port("not-an-ip").is_none());
        assert!(parse_ip_port("127.0.0.1:xyz").is_none());
        assert!(parse_ip_port("127.0.0.1:70000").is_none());
        assert!(parse_ip_port("[::1").is_none());
        assert!(parse_ip_port("[::1]80").is_none());
    }
}
