//! Command-line scanning.
//!
//! Tokens look like `-<flag><value>` with nothing in between: `-s10.0.0.1`,
//! `-uadmin`, `-psecret`, `-c4`. Unknown flags and malformed tokens are
//! skipped, invalid values leave the field untouched, and a later token
//! overrides an earlier one. Nothing happens unless `-s` yields an address.

use std::ffi::OsString;
use std::net::IpAddr;

use secrecy::SecretString;

use nvrcheck_core::ConnectionTarget;

/// Fields collected from the argument list before validation.
#[derive(Debug, Default)]
struct Scanned {
    address: Option<IpAddr>,
    username: Option<String>,
    password: Option<String>,
    expected_devices: Option<i16>,
}

/// Scan `args` (without the program path) into a connection target.
///
/// Returns `None` when no valid server address was given.
pub fn parse<I>(args: I) -> Option<ConnectionTarget>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut scanned = Scanned::default();

    for arg in args {
        let arg: OsString = arg.into();
        // Non-UTF-8 tokens can't carry a recognised flag.
        let Some(token) = arg.to_str() else {
            continue;
        };
        let Some((flag, value)) = split_token(token) else {
            continue;
        };

        match flag {
            's' => {
                if let Ok(address) = value.parse() {
                    scanned.address = Some(address);
                }
            }
            'u' => scanned.username = Some(value.to_owned()),
            'p' => scanned.password = Some(value.to_owned()),
            'c' => {
                if let Ok(count) = value.parse() {
                    scanned.expected_devices = Some(count);
                }
            }
            _ => {}
        }
    }

    let mut target = ConnectionTarget::new(scanned.address?);
    if let Some(username) = scanned.username {
        target.username = username;
    }
    if let Some(password) = scanned.password {
        target.password = SecretString::from(password);
    }
    if let Some(count) = scanned.expected_devices {
        target.expected_devices = count;
    }
    Some(target)
}

/// `-sVALUE` → `('s', "VALUE")`. Tokens without a value are rejected.
fn split_token(token: &str) -> Option<(char, &str)> {
    let rest = token.strip_prefix('-')?;
    let mut chars = rest.chars();
    let flag = chars.next()?;
    let value = chars.as_str();
    (!value.is_empty()).then_some((flag, value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn scan(args: &[&str]) -> Option<ConnectionTarget> {
        parse(args.iter().copied())
    }

    #[test]
    fn full_argument_set() {
        let target = scan(&["-s10.0.0.1", "-uadmin", "-ppw", "-c4"]).unwrap();
        assert_eq!(target.address, IpAddr::from([10, 0, 0, 1]));
        assert_eq!(target.username, "admin");
        assert_eq!(target.password.expose_secret(), "pw");
        assert_eq!(target.expected_devices, 4);
    }

    #[test]
    fn address_only_uses_defaults() {
        let target = scan(&["-s192.168.1.20"]).unwrap();
        assert_eq!(target.username, "");
        assert_eq!(target.password.expose_secret(), "");
        assert_eq!(target.expected_devices, 0);
    }

    #[test]
    fn missing_or_invalid_address_is_none() {
        assert!(scan(&[]).is_none());
        assert!(scan(&["-uadmin", "-ppw", "-c2"]).is_none());
        assert!(scan(&["-snot-an-ip"]).is_none());
        assert!(scan(&["-s"]).is_none());
        assert!(scan(&["s10.0.0.1"]).is_none());
    }

    #[test]
    fn separated_value_is_not_recognised() {
        // The value must be glued to the flag.
        assert!(scan(&["-s", "10.0.0.1"]).is_none());
    }

    #[test]
    fn invalid_values_keep_earlier_ones() {
        let target = scan(&["-s10.0.0.1", "-sbogus", "-c7", "-cmany", "-c99999"]).unwrap();
        assert_eq!(target.address, IpAddr::from([10, 0, 0, 1]));
        assert_eq!(target.expected_devices, 7);
    }

    #[test]
    fn last_occurrence_wins() {
        let target = scan(&["-s10.0.0.1", "-ufirst", "-s10.0.0.2", "-usecond"]).unwrap();
        assert_eq!(target.address, IpAddr::from([10, 0, 0, 2]));
        assert_eq!(target.username, "second");
    }

    #[test]
    fn unknown_flags_ignored() {
        let target = scan(&["-x1", "--verbose", "-s10.0.0.1", "-"]).unwrap();
        assert_eq!(target.address, IpAddr::from([10, 0, 0, 1]));
    }

    #[test]
    fn negative_count_is_kept() {
        let target = scan(&["-s10.0.0.1", "-c-3"]).unwrap();
        assert_eq!(target.expected_devices, -3);
        assert!(!target.expects(0));
    }

    #[test]
    fn ipv6_address_accepted() {
        let target = scan(&["-s::1"]).unwrap();
        assert_eq!(target.address, "::1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn values_may_contain_dashes_and_flag_letters() {
        let target = scan(&["-s10.0.0.1", "-p-s-u", "-uops-team"]).unwrap();
        assert_eq!(target.password.expose_secret(), "-s-u");
        assert_eq!(target.username, "ops-team");
    }
}
