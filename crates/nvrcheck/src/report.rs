//! Console lines for a run.
//!
//! The wording is what operators and their scripts look for, so it stays
//! fixed. Outcomes that leave a file behind, or quietly leave nothing, print
//! nothing.

use std::net::SocketAddr;

use nvrcheck_core::{Outcome, RunReport};

/// Printed as soon as registering the NVR fails.
pub fn registration_failed(endpoint: SocketAddr) -> String {
    format!("An error occurred while adding the NVR.{}", endpoint.ip())
}

pub fn render(report: &RunReport) -> Vec<String> {
    match &report.outcome {
        Outcome::ConnectFailed => vec!["An error occurred while connecting to the NVR.".into()],
        Outcome::LoginFailed(result) => vec![format!("Failed to login to NVR: {result}")],
        Outcome::Cancelled => vec!["Interrupted before the check completed.".into()],
        Outcome::DevicesNotReady | Outcome::SnapshotWritten(_) | Outcome::SnapshotExists(_) => {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use nvrcheck_core::LoginResult;
    use pretty_assertions::assert_eq;

    use super::*;

    fn report(outcome: Outcome) -> RunReport {
        RunReport {
            endpoint: SocketAddr::from(([10, 0, 0, 1], 8443)),
            outcome,
        }
    }

    #[test]
    fn connect_failure_line() {
        assert_eq!(
            render(&report(Outcome::ConnectFailed)),
            vec!["An error occurred while connecting to the NVR."]
        );
    }

    #[test]
    fn login_failure_names_result() {
        assert_eq!(
            render(&report(Outcome::LoginFailed(LoginResult::InvalidCredentials))),
            vec!["Failed to login to NVR: InvalidCredentials"]
        );
    }

    #[test]
    fn registration_line_names_address_without_port() {
        assert_eq!(
            registration_failed(SocketAddr::from(([10, 0, 0, 1], 8443))),
            "An error occurred while adding the NVR.10.0.0.1"
        );
    }

    #[test]
    fn quiet_outcomes() {
        assert!(render(&report(Outcome::DevicesNotReady)).is_empty());
        assert!(render(&report(Outcome::SnapshotWritten(PathBuf::from("10001.xml")))).is_empty());
        assert!(render(&report(Outcome::SnapshotExists(PathBuf::from("10001.xml")))).is_empty());
    }
}
