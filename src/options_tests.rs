// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `options.rs`

#[cfg(test)]
mod tests {
    use crate::constants::{DEFAULT_SECURE_PORT, WAPI_ENDPOINT};
    use crate::options::Options;
    use clap::Parser;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_parse_minimal() {
        let options =
            Options::try_parse_from(["webhook", "--group-name", "acme.example.com"]).unwrap();

        assert_eq!(options.group_name, "acme.example.com");
        assert_eq!(options.secure_port, DEFAULT_SECURE_PORT);
        assert_eq!(options.listen_address().to_string(), "0.0.0.0:443");
        assert!(options.tls_files().is_none());
    }

    #[test]
    fn test_empty_group_name_is_rejected() {
        let result = Options::try_parse_from(["webhook", "--group-name", "  "]);
        assert!(result.is_err(), "blank group name must abort startup");
    }

    #[test]
    fn test_tls_files() {
        let options = Options::try_parse_from([
            "webhook",
            "--group-name",
            "acme.example.com",
            "--secure-port",
            "8443",
            "--tls-cert-file",
            "/tls/tls.crt",
            "--tls-private-key-file",
            "/tls/tls.key",
        ])
        .unwrap();

        let tls = options.tls_files().expect("TLS files should be set");
        assert_eq!(tls.cert_file, PathBuf::from("/tls/tls.crt"));
        assert_eq!(tls.key_file, PathBuf::from("/tls/tls.key"));
        assert_eq!(options.listen_address().port(), 8443);
    }

    #[test]
    fn test_tls_cert_requires_key() {
        let result = Options::try_parse_from([
            "webhook",
            "--group-name",
            "acme.example.com",
            "--tls-cert-file",
            "/tls/tls.crt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_wedos_defaults() {
        let options = Options::try_parse_from([
            "webhook",
            "--group-name",
            "acme.example.com",
            "--wedos-ttl",
            "120",
            "--wedos-http-timeout",
            "30",
        ])
        .unwrap();

        let defaults = options.wedos_defaults();
        assert_eq!(defaults.endpoint, WAPI_ENDPOINT);
        assert_eq!(defaults.ttl, 120);
        assert_eq!(defaults.http_timeout, Duration::from_secs(30));
        assert!(defaults.username.is_empty());
        assert!(defaults.password.is_empty());
    }
}
