//! Failure reporting and exit codes.

use serde_json::json;

use atis_fetch::AtisError;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Exit status for a finished command: 0 on success, 1 on any error.
pub fn exit_code<T>(result: &anyhow::Result<T>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}

/// Taxonomy name of the underlying failure, or `"Error"` for anything
/// raised outside the library.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<AtisError>()
        .map(AtisError::kind)
        .unwrap_or("Error")
}

/// Human-readable report, written to stderr.
pub fn error_line(err: &anyhow::Error) -> String {
    format!("Error [{}]: {err:#}", error_kind(err))
}

/// Machine-readable report, written to stdout under `--json`.
pub fn error_json(err: &anyhow::Error) -> serde_json::Value {
    json!({
        "error": true,
        "kind": error_kind(err),
        "message": format!("{err:#}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&anyhow::Ok(())), 0);
        let failed: anyhow::Result<()> = Err(AtisError::Transport("HTTP 500".into()).into());
        assert_eq!(exit_code(&failed), 1);
    }

    #[test]
    fn test_error_line_names_the_kind() {
        let err = anyhow::Error::from(AtisError::Transport(
            "POST /x returned HTTP 500".into(),
        ));
        assert_eq!(
            error_line(&err),
            "Error [TransportError]: transport error: POST /x returned HTTP 500"
        );
    }

    #[test]
    fn test_kind_survives_context() {
        let err = Err::<(), _>(AtisError::ZoneNotFound {
            zone: "atisZone".into(),
            present: vec!["otherZone".into()],
        })
        .context("fetch failed")
        .unwrap_err();
        assert_eq!(error_kind(&err), "ZoneNotFoundError");
        let line = error_line(&err);
        assert!(line.starts_with("Error [ZoneNotFoundError]: fetch failed: "));
        assert!(line.contains("otherZone"));
    }

    #[test]
    fn test_foreign_error_is_generic() {
        let err = anyhow::anyhow!("failed to read fragment x.html");
        assert_eq!(error_line(&err), "Error [Error]: failed to read fragment x.html");
    }

    #[test]
    fn test_error_json_shape() {
        let err = anyhow::Error::from(AtisError::Config("zone id must not be empty".into()));
        let v = error_json(&err);
        assert_eq!(v["error"], true);
        assert_eq!(v["kind"], "ConfigError");
        assert_eq!(v["message"], "invalid configuration: zone id must not be empty");
    }
}
