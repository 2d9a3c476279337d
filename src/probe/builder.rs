use reqwest::Url;

use crate::catalog::TestCase;
use crate::error::ProbeError;
use crate::http::ProbeRequest;
use crate::models::Payload;

/// Baseline probe every category starts from: an empty JSON POST against the
/// target. Active payloads (param/header/method) mutate it; metadata-only
/// payloads ride it unchanged apart from an informational header.
const BASELINE_METHOD: &str = "POST";
const BASELINE_BODY: &str = "{}";

/// Informational header carrying technique inputs that are not expressible
/// as a single outbound request (storage, encoding, race, and friends). The
/// probe still goes out as the baseline request; the result records the
/// technique input verbatim. Intentionally weak semantics, kept from the
/// reference behavior.
pub const TECHNIQUE_HEADER: &str = "X-Probe-Technique";

pub fn validate_target(target: &str) -> Result<Url, ProbeError> {
    let url = Url::parse(target).map_err(|_| ProbeError::InvalidTarget(target.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ProbeError::InvalidTarget(target.to_string())),
    }
}

pub fn build_request(target: &str, case: &TestCase) -> Result<ProbeRequest, ProbeError> {
    let url = validate_target(target)?;

    let mut request = ProbeRequest {
        url: url.to_string(),
        method: BASELINE_METHOD.to_string(),
        headers: vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ],
        body: Some(BASELINE_BODY.to_string()),
    };

    match &case.payload {
        Payload::Param { key, value } => {
            let pair = if value.is_empty() {
                urlencoding::encode(key).to_string()
            } else {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            };
            // Merge through the Url so the pair lands in the query even when
            // the target carries a fragment.
            let merged = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{}&{}", existing, pair),
                _ => pair,
            };
            let mut probe_url = url.clone();
            probe_url.set_query(Some(&merged));
            request.url = probe_url.to_string();
        }
        Payload::Header { name, value } => {
            request.set_header(name, value);
        }
        Payload::Method { verb } => {
            request.method = verb.clone();
        }
        Payload::Storage { .. } | Payload::Opaque { .. } => {
            request.set_header(TECHNIQUE_HEADER, &case.payload.render());
        }
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryId;

    const TARGET: &str = "https://api.example.test/v2/account/delete";

    fn case(category: CategoryId, payload: Payload) -> TestCase {
        TestCase::new(category, payload, "case under test")
    }

    #[test]
    fn test_param_appends_query_pair() {
        let tc = case(CategoryId::Parameter, Payload::param("skip validation", "true"));
        let request = build_request(TARGET, &tc).unwrap();
        assert_eq!(request.url, format!("{}?skip%20validation=true", TARGET));
        assert_eq!(request.method, "POST");
    }

    #[test]
    fn test_param_respects_existing_query() {
        let tc = case(CategoryId::Parameter, Payload::param("force", "true"));
        let request = build_request(&format!("{}?id=1", TARGET), &tc).unwrap();
        assert!(request.url.ends_with("?id=1&force=true"));
    }

    #[test]
    fn test_param_lands_in_query_not_fragment() {
        let tc = case(CategoryId::Parameter, Payload::param("debug", "true"));
        let request = build_request(&format!("{}#confirm", TARGET), &tc).unwrap();
        assert_eq!(request.url, format!("{}?debug=true#confirm", TARGET));
    }

    #[test]
    fn test_header_payload_added_to_baseline() {
        let tc = case(CategoryId::Header, Payload::header("X-Forwarded-For", "127.0.0.1"));
        let request = build_request(TARGET, &tc).unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.body.as_deref(), Some("{}"));
        assert!(request
            .headers
            .contains(&("X-Forwarded-For".to_string(), "127.0.0.1".to_string())));
    }

    #[test]
    fn test_method_payload_overrides_verb() {
        let tc = case(CategoryId::Method, Payload::method("purge"));
        let request = build_request(TARGET, &tc).unwrap();
        assert_eq!(request.method, "PURGE");
        assert_eq!(request.body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_opaque_payload_rides_baseline_with_marker() {
        let tc = case(CategoryId::Race, Payload::opaque("duplicate submit with same token"));
        let request = build_request(TARGET, &tc).unwrap();
        assert_eq!(request.method, "POST");
        assert!(request.headers.contains(&(
            TECHNIQUE_HEADER.to_string(),
            "duplicate submit with same token".to_string()
        )));
    }

    #[test]
    fn test_invalid_target_rejected() {
        let tc = case(CategoryId::Parameter, Payload::param("debug", "true"));
        for target in ["not a url", "/relative/path", "ftp://example.test/"] {
            let err = build_request(target, &tc).unwrap_err();
            assert!(matches!(err, ProbeError::InvalidTarget(_)), "{}", target);
        }
    }
}
