//! Builtin technique tables. Order within each table is the execution order
//! observed by progress events and report rows.

use super::{Category, CategoryId, TestCase};
use crate::models::Payload;

const PARAM_CASES: &[(&str, &str, &str)] = &[
    ("confirm", "false", "Confirmation flag forced off"),
    ("force", "true", "Force flag set"),
    ("admin", "true", "Admin flag injection"),
    ("debug", "true", "Debug mode toggle"),
    ("dry_run", "true", "Dry-run escape hatch"),
    ("validate", "false", "Validation disabled via flag"),
    ("skip_validation", "true", "Validation skip flag"),
    ("soft", "true", "Soft-delete downgrade"),
    ("async", "true", "Asynchronous processing hint"),
    ("internal", "true", "Internal caller flag"),
    ("test", "true", "Test-mode flag"),
    ("bypass", "true", "Literal bypass flag"),
    ("override", "true", "Override flag"),
    ("redirect", "/", "Post-action redirect rewrite"),
    ("callback", "https://localhost/", "Callback URL substitution"),
];

const HEADER_CASES: &[(&str, &str, &str)] = &[
    ("X-Forwarded-For", "127.0.0.1", "Loopback origin spoof"),
    ("X-Real-IP", "127.0.0.1", "Real-IP loopback spoof"),
    ("True-Client-IP", "127.0.0.1", "CDN client-IP spoof"),
    ("X-Originating-IP", "127.0.0.1", "Originating-IP spoof"),
    ("X-Forwarded-Host", "localhost", "Forwarded host rewrite"),
    ("X-Original-URL", "/", "Original-URL override"),
    ("X-HTTP-Method-Override", "GET", "Method override header"),
    ("X-Requested-With", "XMLHttpRequest", "AJAX marker injection"),
    ("Origin", "null", "Null origin"),
    ("Referer", "https://localhost/", "Referer rewrite"),
    ("X-Admin", "true", "Admin marker header"),
    ("X-Debug", "true", "Debug marker header"),
    ("X-Api-Version", "1", "API version downgrade"),
    ("X-Csrf-Token", "null", "Null CSRF token"),
    ("Accept-Language", "en;q=0, *;q=0", "Degenerate language negotiation"),
];

const METHOD_VERBS: &[(&str, &str)] = &[
    ("GET", "Replay as GET"),
    ("POST", "Replay as POST"),
    ("PUT", "Replay as PUT"),
    ("PATCH", "Replay as PATCH"),
    ("DELETE", "Replay as DELETE"),
    ("HEAD", "Replay as HEAD"),
    ("OPTIONS", "Replay as OPTIONS"),
    ("TRACE", "Replay as TRACE"),
    ("CONNECT", "Replay as CONNECT"),
    ("PROPFIND", "WebDAV PROPFIND"),
    ("PURGE", "Cache PURGE verb"),
    ("LINK", "Deprecated LINK verb"),
    ("UNLINK", "Deprecated UNLINK verb"),
    ("LOCK", "WebDAV LOCK"),
    ("UNLOCK", "WebDAV UNLOCK"),
    ("REPORT", "WebDAV REPORT"),
    ("SEARCH", "SEARCH verb"),
    ("COPY", "WebDAV COPY"),
    ("MOVE", "WebDAV MOVE"),
    ("DEBUG", "Nonstandard DEBUG verb"),
];

const STORAGE_CASES: &[(&str, &str, &str)] = &[
    ("session_state", "expired", "Session state marked expired"),
    ("account_flags", "{}", "Account flags cleared"),
    ("deletion_token", "", "Deletion token blanked"),
    ("feature_overrides", "legacy", "Legacy feature path forced"),
    ("cache_version", "0", "Cache version rollback"),
    ("pending_ops", "[]", "Pending operation queue cleared"),
];

const ENCODING_CASES: &[(&str, &str)] = &[
    ("double-url-encoded path segment", "Double URL encoding"),
    ("unicode homoglyph in identifier", "Homoglyph substitution"),
    ("utf-7 encoded body", "UTF-7 body encoding"),
    ("base64 wrapped identifier", "Base64 identifier wrapping"),
    ("null byte suffix %00", "Null byte truncation"),
    ("overlong utf-8 sequence", "Overlong UTF-8 encoding"),
    ("mixed-case percent escapes", "Mixed-case percent encoding"),
    ("plus-as-space substitution", "Plus/space substitution"),
];

const ENDPOINT_CASES: &[(&str, &str)] = &[
    ("trailing slash variant", "Trailing slash"),
    ("duplicate path segment", "Duplicated segment"),
    ("dot-segment /./ insertion", "Dot-segment insertion"),
    ("uppercase path variant", "Case-folded path"),
    ("versioned path downgrade /v1/", "API version path downgrade"),
    (".json extension suffix", "Format extension suffix"),
    ("semicolon matrix parameter", "Matrix parameter"),
    ("fragment suffix #", "Fragment suffix"),
];

const AUTH_CASES: &[(&str, &str)] = &[
    ("expired bearer token replay", "Expired token replay"),
    ("empty bearer token", "Empty bearer token"),
    ("basic auth with blank password", "Blank basic-auth password"),
    ("session cookie without csrf pair", "Cookie without CSRF pair"),
    ("token scoped to sibling account", "Cross-account token"),
    ("malformed jwt signature", "Malformed JWT signature"),
    ("downgraded auth scheme", "Auth scheme downgrade"),
];

const CONTENT_CASES: &[(&str, &str)] = &[
    ("content-type text/plain switch", "Plaintext content type"),
    ("multipart instead of json", "Multipart body switch"),
    ("empty body with length header", "Empty body, declared length"),
    ("json array wrapper", "Array-wrapped JSON body"),
    ("xml body equivalent", "XML body equivalent"),
    ("truncated json object", "Truncated JSON"),
];

const RACE_CASES: &[(&str, &str)] = &[
    ("duplicate submit with same token", "Token double-submit"),
    ("cancel-then-confirm interleave", "Cancel/confirm interleave"),
    ("parallel delete and update", "Delete/update race"),
    ("stale revision write", "Stale revision write"),
    ("retry inside timeout window", "Timeout-window retry"),
];

const FRONTEND_CASES: &[(&str, &str)] = &[
    ("hidden field tamper", "Hidden field tampering"),
    ("disabled control re-enable", "Disabled control re-enable"),
    ("client-side validation skip", "Client validation skip"),
    ("readonly attribute removal", "Readonly attribute removal"),
    ("form action rewrite", "Form action rewrite"),
    ("dom state desync replay", "DOM state desync replay"),
];

pub(super) fn builtin_categories() -> Vec<Category> {
    vec![
        Category {
            id: CategoryId::Parameter,
            cases: PARAM_CASES
                .iter()
                .map(|(k, v, d)| TestCase::new(CategoryId::Parameter, Payload::param(k, v), d))
                .collect(),
        },
        Category {
            id: CategoryId::Header,
            cases: HEADER_CASES
                .iter()
                .map(|(n, v, d)| TestCase::new(CategoryId::Header, Payload::header(n, v), d))
                .collect(),
        },
        Category {
            id: CategoryId::Method,
            cases: METHOD_VERBS
                .iter()
                .map(|(verb, d)| TestCase::new(CategoryId::Method, Payload::method(verb), d))
                .collect(),
        },
        Category {
            id: CategoryId::Storage,
            cases: STORAGE_CASES
                .iter()
                .map(|(k, v, d)| TestCase::new(CategoryId::Storage, Payload::storage(k, v), d))
                .collect(),
        },
        opaque_category(CategoryId::Encoding, ENCODING_CASES),
        opaque_category(CategoryId::Endpoint, ENDPOINT_CASES),
        opaque_category(CategoryId::Auth, AUTH_CASES),
        opaque_category(CategoryId::Content, CONTENT_CASES),
        opaque_category(CategoryId::Race, RACE_CASES),
        opaque_category(CategoryId::Frontend, FRONTEND_CASES),
    ]
}

fn opaque_category(id: CategoryId, table: &[(&str, &str)]) -> Category {
    Category {
        id,
        cases: table
            .iter()
            .map(|(input, d)| TestCase::new(id, Payload::opaque(input), d))
            .collect(),
    }
}
