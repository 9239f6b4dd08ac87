//! Wire format of the ESPurna REST API. Everything is plain text: the relay
//! endpoint answers `"1"`/`"0"`, a write echoes the new value back, and the
//! power endpoint answers a bare wattage number.

use crate::device::{DriverError, RelayStatus};

pub fn relay_url(base: &str, relay: u8, api_key: &str) -> String {
    format!("{base}/api/relay/{relay}?apikey={api_key}")
}

pub fn relay_write_url(base: &str, relay: u8, api_key: &str, on: bool) -> String {
    format!("{base}/api/relay/{relay}?apikey={api_key}&value={}", on as u8)
}

pub fn power_url(base: &str, api_key: &str) -> String {
    format!("{base}/api/apparent?apikey={api_key}")
}

pub fn parse_status(body: &str) -> Result<RelayStatus, DriverError> {
    match body.trim() {
        "1" => Ok(RelayStatus::On),
        "0" => Ok(RelayStatus::Off),
        _ => Err(unexpected(body)),
    }
}

/// A successful write echoes the commanded value; any other body means the
/// device refused or misunderstood the command.
pub fn parse_ack(body: &str, on: bool) -> Result<(), DriverError> {
    let expected = match on {
        true => "1",
        false => "0",
    };

    match body.trim() == expected {
        true => Ok(()),
        false => Err(unexpected(body)),
    }
}

pub fn parse_power(body: &str) -> Result<f64, DriverError> {
    body.trim().parse().map_err(|_| unexpected(body))
}

fn unexpected(body: &str) -> DriverError {
    DriverError::UnexpectedPayload(body.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(
            relay_url("http://10.0.0.7", 0, "C0FFEE"),
            "http://10.0.0.7/api/relay/0?apikey=C0FFEE"
        );

        assert_eq!(
            relay_write_url("http://10.0.0.7", 0, "C0FFEE", true),
            "http://10.0.0.7/api/relay/0?apikey=C0FFEE&value=1"
        );

        assert_eq!(
            power_url("http://10.0.0.7", "C0FFEE"),
            "http://10.0.0.7/api/apparent?apikey=C0FFEE"
        );
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("1").unwrap(), RelayStatus::On);
        assert_eq!(parse_status("0\n").unwrap(), RelayStatus::Off);

        for body in ["", "2", "on", "01"] {
            assert!(matches!(
                parse_status(body),
                Err(DriverError::UnexpectedPayload(_))
            ));
        }
    }

    #[test]
    fn test_parse_ack_requires_echo() {
        assert!(parse_ack("1", true).is_ok());
        assert!(parse_ack("0", false).is_ok());

        // The device answers with the old value when the write is refused.
        assert!(parse_ack("0", true).is_err());
        assert!(parse_ack("OK", true).is_err());
    }

    #[test]
    fn test_parse_power() {
        assert_eq!(parse_power("1234").unwrap(), 1234.);
        assert_eq!(parse_power(" 56.5 ").unwrap(), 56.5);
        assert!(parse_power("n/a").is_err());
    }
}
