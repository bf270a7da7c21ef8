use std::time::Duration;

use mlua::{Table, Value};
use url::Url;
use verdict_core::ResponseCallback;

use super::callback;

#[derive(Debug, Default, Clone)]
pub(super) struct HttpRequestOptions {
    pub(super) headers: Vec<(String, String)>,
    pub(super) params: Vec<(String, String)>,
    pub(super) timeout: Option<Duration>,
    pub(super) tags: Vec<(String, String)>,
    pub(super) name: Option<String>,
    pub(super) response_callback: ResponseCallback,
}

fn scalar_to_string(v: Value, allow_bool: bool) -> Option<String> {
    match v {
        Value::String(s) => Some(s.to_string_lossy().to_string()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Boolean(b) if allow_bool => Some(b.to_string()),
        _ => None,
    }
}

// Non-string keys and non-scalar values are skipped.
fn string_pairs(opts: &Table, key: &str, allow_bool: bool) -> mlua::Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    let Ok(t) = opts.get::<Table>(key) else {
        return Ok(out);
    };

    for pair in t.pairs::<Value, Value>() {
        let (k, v) = pair?;
        let Value::String(k) = k else {
            continue;
        };
        if let Some(v) = scalar_to_string(v, allow_bool) {
            out.push((k.to_string_lossy().to_string(), v));
        }
    }
    Ok(out)
}

// Zero, negative, non-finite and out-of-range values are all rejected.
fn parse_timeout(v: Value) -> crate::Result<Option<Duration>> {
    let timeout = match v {
        Value::Nil => return Ok(None),
        Value::Number(n) => Duration::try_from_secs_f64(n).ok(),
        Value::Integer(i) => u64::try_from(i).ok().map(Duration::from_secs),
        Value::String(s) => humantime::parse_duration(&s.to_string_lossy()).ok(),
        _ => None,
    };

    match timeout {
        Some(d) if !d.is_zero() => Ok(Some(d)),
        _ => Err(crate::Error::InvalidDuration),
    }
}

pub(super) fn parse_http_opts(opts: Option<Table>) -> crate::Result<HttpRequestOptions> {
    let Some(opts) = opts else {
        return Ok(HttpRequestOptions::default());
    };

    let headers = string_pairs(&opts, "headers", false)?;
    let params = string_pairs(&opts, "params", false)?;
    let tags = string_pairs(&opts, "tags", true)?;
    let timeout = parse_timeout(opts.get::<Value>("timeout")?)?;

    let name = match opts.get::<Value>("name")? {
        Value::Nil => None,
        v => scalar_to_string(v, false),
    };

    let callback = match opts.get::<Value>("response_callback")? {
        Value::Nil => opts.get::<Value>("responseCallback")?,
        v => v,
    };
    let response_callback = callback::per_request(&callback)?;

    Ok(HttpRequestOptions {
        headers,
        params,
        timeout,
        tags,
        name,
        response_callback,
    })
}

/// Appends `params` to the query string. Unparseable urls are passed through untouched.
pub(super) fn with_query_params(url: String, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url;
    }

    let Ok(mut u) = Url::parse(&url) else {
        return url;
    };

    u.query_pairs_mut().extend_pairs(params);
    u.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(lua: &mlua::Lua, src: &str) -> Table {
        lua.load(src)
            .eval()
            .unwrap_or_else(|err| panic!("eval {src}: {err}"))
    }

    #[test]
    fn none_is_defaults() {
        let out = parse_http_opts(None).unwrap_or_else(|err| panic!("parse_http_opts: {err}"));
        assert!(out.headers.is_empty());
        assert!(out.tags.is_empty());
        assert!(out.timeout.is_none());
        assert_eq!(out.response_callback, ResponseCallback::UseResolvedDefault);
    }

    #[test]
    fn timeout_accepts_seconds_and_durations() {
        let lua = mlua::Lua::new();
        let out = parse_http_opts(Some(table(&lua, r#"return { timeout = "150ms" }"#)))
            .unwrap_or_else(|err| panic!("parse_http_opts: {err}"));
        assert_eq!(out.timeout, Some(Duration::from_millis(150)));

        let out = parse_http_opts(Some(table(&lua, "return { timeout = 2 }")))
            .unwrap_or_else(|err| panic!("parse_http_opts: {err}"));
        assert_eq!(out.timeout, Some(Duration::from_secs(2)));

        assert!(matches!(
            parse_http_opts(Some(table(&lua, "return { timeout = -1 }"))),
            Err(crate::Error::InvalidDuration)
        ));
    }

    #[test]
    fn timeout_rejects_values_without_a_duration() {
        let lua = mlua::Lua::new();
        for src in [
            "return { timeout = math.huge }",
            "return { timeout = 1e300 }",
            "return { timeout = 0/0 }",
            "return { timeout = -0.5 }",
            "return { timeout = 0 }",
            r#"return { timeout = "0s" }"#,
            r#"return { timeout = "soon" }"#,
            "return { timeout = true }",
        ] {
            assert!(
                matches!(
                    parse_http_opts(Some(table(&lua, src))),
                    Err(crate::Error::InvalidDuration)
                ),
                "{src} must be rejected"
            );
        }

        let out = parse_http_opts(Some(table(&lua, "return { timeout = 0.25 }")))
            .unwrap_or_else(|err| panic!("parse_http_opts: {err}"));
        assert_eq!(out.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn tags_keep_scalars_only() {
        let lua = mlua::Lua::new();
        let out = parse_http_opts(Some(table(
            &lua,
            r#"return { name = "login", tags = { env = "staging", build = 123, canary = true, nested = {} } }"#,
        )))
        .unwrap_or_else(|err| panic!("parse_http_opts: {err}"));

        let mut tags = out.tags;
        tags.sort();
        assert_eq!(
            tags,
            vec![
                ("build".to_string(), "123".to_string()),
                ("canary".to_string(), "true".to_string()),
                ("env".to_string(), "staging".to_string()),
            ]
        );
        assert_eq!(out.name.as_deref(), Some("login"));
    }

    #[test]
    fn false_callback_disables_and_camel_case_is_accepted() {
        let lua = mlua::Lua::new();
        let out = parse_http_opts(Some(table(&lua, "return { responseCallback = false }")))
            .unwrap_or_else(|err| panic!("parse_http_opts: {err}"));
        assert_eq!(out.response_callback, ResponseCallback::Disabled);

        assert!(matches!(
            parse_http_opts(Some(table(&lua, r#"return { response_callback = "200" }"#))),
            Err(crate::Error::InvalidResponseCallback)
        ));
    }

    #[test]
    fn query_params_are_appended() {
        let out = with_query_params(
            "https://example.com/path".to_string(),
            &[("a".to_string(), "1".to_string())],
        );
        assert_eq!(out, "https://example.com/path?a=1");
        assert_eq!(
            with_query_params("not a url".to_string(), &[("a".to_string(), "1".to_string())]),
            "not a url"
        );
    }
}
