#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use dadata_exporter::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
upstream:
  base_url: "https://dadata.ru/api/v2"
  timeout: 1000 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "config");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.exporter.listen, "0.0.0.0:9501");
    assert_eq!(cfg.upstream.base_url, "https://dadata.ru/api/v2");
    assert_eq!(cfg.upstream.timeout(), None);
}

#[test]
fn ok_full_config() {
    let ok = r#"
version: 1
exporter:
  listen: "127.0.0.1:9601"
upstream:
  base_url: "http://localhost:8080/api/v2"
  timeout_ms: 2500
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.exporter.listen_addr().unwrap().port(), 9601);
    assert_eq!(cfg.upstream.timeout(), Some(Duration::from_millis(2500)));
}

#[test]
fn rejects_invalid_values() {
    let cases = [
        "version: 2\n",
        "version: 1\nexporter:\n  listen: \"not-an-addr\"\n",
        "version: 1\nupstream:\n  base_url: \"dadata.ru/api/v2\"\n",
        "version: 1\nupstream:\n  timeout_ms: 10\n",
    ];
    for c in cases {
        let err = config::load_from_str(c).expect_err("must fail");
        assert_eq!(err.kind().as_str(), "config", "case={c}");
    }
}

#[test]
fn defaults_without_file() {
    let cfg = config::load(None).expect("defaults are valid");
    assert_eq!(cfg.version, 1);
}

#[test]
fn missing_file_is_config_error() {
    let err = config::load(Some("does/not/exist.yaml")).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "config");
}
