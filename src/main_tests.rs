// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `main.rs` - command line parsing and signal handling

#[cfg(test)]
mod tests {
    use super::super::{Cli, ControllerKind, LogFormat};
    use clap::Parser;
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn test_defaults_run_both_controllers() {
        let cli = Cli::try_parse_from(["cloudkit"]).expect("defaults should parse");

        assert!(cli.runs(ControllerKind::Zone));
        assert!(cli.runs(ControllerKind::Record));
        assert!(!cli.install_crds);
        assert!(!cli.crd);
        assert_eq!(cli.metrics_addr.port(), 8080);

        let config = cli.controller_config();
        assert_eq!(config.namespace, None);
        assert_eq!(config.resync_interval, Some(Duration::from_secs(300)));
        assert_eq!(config.error_requeue, Duration::from_secs(30));
    }

    #[test]
    fn test_controllers_comma_separated() {
        let cli = Cli::try_parse_from(["cloudkit", "--controllers", "record"])
            .expect("single controller should parse");
        assert!(!cli.runs(ControllerKind::Zone));
        assert!(cli.runs(ControllerKind::Record));

        let cli = Cli::try_parse_from(["cloudkit", "--controllers", "zone,record"])
            .expect("list should parse");
        assert_eq!(
            cli.controllers,
            vec![ControllerKind::Zone, ControllerKind::Record]
        );
    }

    #[test]
    fn test_unknown_controller_rejected() {
        assert!(Cli::try_parse_from(["cloudkit", "--controllers", "provider"]).is_err());
    }

    #[test]
    fn test_zero_resync_waits_for_changes() {
        let cli = Cli::try_parse_from([
            "cloudkit",
            "--resync-interval-secs",
            "0",
            "--error-requeue-secs",
            "5",
            "--namespace",
            "dns",
        ])
        .expect("flags should parse");

        let config = cli.controller_config();
        assert_eq!(config.resync_interval, None);
        assert_eq!(config.error_requeue, Duration::from_secs(5));
        assert_eq!(config.namespace.as_deref(), Some("dns"));
    }

    #[test]
    fn test_explicit_log_format_wins() {
        let cli = Cli::try_parse_from(["cloudkit", "--log-format", "json"])
            .expect("log format should parse");
        assert_eq!(cli.resolved_log_format(), LogFormat::Json);
    }

    #[test]
    fn test_invalid_metrics_addr_rejected() {
        assert!(Cli::try_parse_from(["cloudkit", "--metrics-addr", "not-an-addr"]).is_err());
    }

    /// Test that SIGTERM signal handler can be created on Unix platforms
    #[tokio::test]
    #[cfg(unix)]
    async fn test_sigterm_signal_handler_creation() {
        use tokio::signal::unix::{signal, SignalKind};

        let result = signal(SignalKind::terminate());
        assert!(
            result.is_ok(),
            "Should be able to create SIGTERM signal handler"
        );
    }

    /// The shutdown future stays pending until a signal arrives
    #[tokio::test]
    async fn test_shutdown_signal_pending_without_signal() {
        let result = timeout(Duration::from_millis(100), super::super::shutdown_signal()).await;
        assert!(
            result.is_err(),
            "shutdown_signal() should time out when no signal is sent"
        );
    }
}
