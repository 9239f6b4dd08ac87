//! Wire format of the ESPEasy `/control` endpoint.

use serde_json::Value;

use crate::device::{DriverError, RelayStatus};

const ACK: &str = "OK";

pub fn status_url(base: &str, gpio: u8) -> String {
    format!("{base}/control?cmd=status,gpio,{gpio}")
}

pub fn event_url(base: &str, on: bool) -> String {
    let event = match on {
        true => "TurnOn",
        false => "TurnOff",
    };

    format!("{base}/control?cmd=event,{event}")
}

/// Parses the JSON status body. Only a `state` field equal to 1 or 0 counts
/// as an answer; anything else is treated as a failed poll.
pub fn parse_status(body: &str) -> Result<RelayStatus, DriverError> {
    let json: Value =
        serde_json::from_str(body).map_err(|_| unexpected(body))?;

    match json.get("state").and_then(Value::as_i64) {
        Some(1) => Ok(RelayStatus::On),
        Some(0) => Ok(RelayStatus::Off),
        _ => Err(unexpected(body)),
    }
}

pub fn parse_ack(body: &str) -> Result<(), DriverError> {
    match body.trim() == ACK {
        true => Ok(()),
        false => Err(unexpected(body)),
    }
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
            status_url("http://10.0.0.7", 12),
            "http://10.0.0.7/control?cmd=status,gpio,12"
        );

        assert_eq!(
            event_url("http://10.0.0.7", true),
            "http://10.0.0.7/control?cmd=event,TurnOn"
        );

        assert_eq!(
            event_url("http://10.0.0.7", false),
            "http://10.0.0.7/control?cmd=event,TurnOff"
        );
    }

    #[test]
    fn test_parse_status() {
        let on = r#"{"log": "", "plugin": 1, "pin": 12, "mode": "output", "state": 1}"#;
        let off = r#"{"state": 0}"#;

        assert_eq!(parse_status(on).unwrap(), RelayStatus::On);
        assert_eq!(parse_status(off).unwrap(), RelayStatus::Off);
    }

    #[test]
    fn test_parse_status_rejects_other_bodies() {
        for body in ["", "not json", r#"{"state": 2}"#, r#"{"state": "1"}"#, "{}"] {
            assert!(matches!(
                parse_status(body),
                Err(DriverError::UnexpectedPayload(_))
            ));
        }
    }

    #[test]
    fn test_parse_ack() {
        assert!(parse_ack("OK").is_ok());
        assert!(parse_ack("OK\r\n").is_ok());
        assert!(parse_ack("FAIL").is_err());
        assert!(parse_ack("").is_err());
    }
}
