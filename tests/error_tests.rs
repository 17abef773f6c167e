//! Tests for the error system.

use hybrid_lm::error::*;
use pretty_assertions::assert_eq;

#[test]
fn transport_error_creation() {
    let err = LanguageModelError::transport(404, "Not found");
    assert!(matches!(&err, LanguageModelError::Transport { status: 404, .. }));
    assert_eq!(err.to_string(), "Transport error (status 404): Not found");
    assert_eq!(err.status(), Some(404));
}

#[test]
fn kind_and_retryable_mappings_are_stable() {
    struct Case {
        error: LanguageModelError,
        kind: ErrorKind,
        retryable: bool,
    }

    let network_error = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases = vec![
        Case {
            error: LanguageModelError::transport(503, "busy"),
            kind: ErrorKind::Transport,
            retryable: true,
        },
        Case {
            error: LanguageModelError::transport(429, "slow down"),
            kind: ErrorKind::Transport,
            retryable: true,
        },
        Case {
            error: LanguageModelError::transport(400, "bad"),
            kind: ErrorKind::Transport,
            retryable: false,
        },
        Case {
            error: LanguageModelError::Network(network_error),
            kind: ErrorKind::Transport,
            retryable: true,
        },
        Case {
            error: LanguageModelError::Timeout(5000),
            kind: ErrorKind::Transport,
            retryable: true,
        },
        Case {
            error: LanguageModelError::Decode("bad utf-8".into()),
            kind: ErrorKind::Decode,
            retryable: false,
        },
        Case {
            error: LanguageModelError::CapabilityProbe("host gone".into()),
            kind: ErrorKind::CapabilityProbe,
            retryable: false,
        },
        Case {
            error: LanguageModelError::InvalidArgument("topK".into()),
            kind: ErrorKind::InvalidArgument,
            retryable: false,
        },
        Case {
            error: LanguageModelError::Configuration("bad".into()),
            kind: ErrorKind::Configuration,
            retryable: false,
        },
        Case {
            error: LanguageModelError::Io(io_error),
            kind: ErrorKind::Configuration,
            retryable: false,
        },
        Case {
            error: LanguageModelError::Serialization(serde_error),
            kind: ErrorKind::Serialization,
            retryable: false,
        },
    ];

    for case in cases {
        assert_eq!(case.error.kind(), case.kind, "{}", case.error);
        assert_eq!(case.error.is_retryable(), case.retryable, "{}", case.error);
    }
}

#[test]
fn construction_wraps_once_and_delegates() {
    let inner = LanguageModelError::transport(502, "Bad Gateway");
    let wrapped = LanguageModelError::construction(inner);
    let rewrapped = LanguageModelError::construction(wrapped);

    assert_eq!(rewrapped.kind(), ErrorKind::Construction);
    assert_eq!(rewrapped.status(), Some(502));
    assert!(rewrapped.is_retryable());
    match &rewrapped {
        LanguageModelError::Construction { source } => {
            assert!(matches!(**source, LanguageModelError::Transport { .. }))
        }
        other => panic!("expected construction, got {other:?}"),
    }
    assert_eq!(
        rewrapped.to_string(),
        "Model construction failed: Transport error (status 502): Bad Gateway"
    );
}

#[test]
fn error_kind_serializes_snake_case() {
    assert_eq!(ErrorKind::InvalidArgument.to_string(), "invalid_argument");
    assert_eq!(
        serde_json::to_string(&ErrorKind::CapabilityProbe).unwrap(),
        "\"capability_probe\""
    );
}
