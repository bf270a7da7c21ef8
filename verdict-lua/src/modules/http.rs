use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use mlua::{Function, Lua, MultiValue, Table, Value};
use verdict_core::{HttpRequest, HttpRequestMeta, Transport, VuContext};

use crate::json_util;
use crate::vu_api;
use crate::{Error, Result};

mod callback;
mod opts;
mod result;

use opts::{parse_http_opts, with_query_params};
use result::HttpLuaResponse;

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

// Raises builder errors as bare strings, so scripts see the message without a traceback.
const RAISE_BUILD_ERROR: &str = r#"
local build = ...
return function(...)
  local matcher, err = build(...)
  if err ~= nil then
    error(err, 0)
  end
  return matcher
end
"#;

pub(super) fn register_runtime<T: Transport>(lua: &Lua, transport: Arc<T>) -> Result<()> {
    let loader = lua.create_function(move |lua, ()| create_http_module(lua, transport.clone()))?;
    super::preload_set(lua, "wrkr/http", loader)
}

fn create_http_module<T: Transport>(lua: &Lua, transport: Arc<T>) -> mlua::Result<Table> {
    let http_tbl = lua.create_table()?;

    // expected_statuses(200, { min = 300, max = 399 }, ...) -> matcher
    let build = lua.create_function(|lua, args: MultiValue| {
        match callback::expected_statuses(&args) {
            Ok(m) => Ok((Value::UserData(lua.create_userdata(m)?), Value::Nil)),
            Err(err) => Ok((Value::Nil, Value::String(lua.create_string(err.to_string())?))),
        }
    })?;
    let expected_statuses: Function = lua
        .load(RAISE_BUILD_ERROR)
        .set_name("=expected_statuses")
        .call(build)?;
    http_tbl.set("expected_statuses", expected_statuses.clone())?;
    http_tbl.set("expectedStatuses", expected_statuses)?;

    let set_response_callback = lua.create_function(|lua, value: Value| {
        let cb = callback::vu_wide(&value).map_err(mlua::Error::external)?;
        vu_api::with_vu_mut(lua, |vu| vu.set_response_callback(cb))
    })?;
    http_tbl.set("set_response_callback", set_response_callback.clone())?;
    http_tbl.set("setResponseCallback", set_response_callback)?;

    // request(method, url, body?, opts?)
    let request = {
        let transport = transport.clone();
        lua.create_async_function(
            move |lua, (method, url, body, opts): (String, String, Value, Option<Table>)| {
                let transport = transport.clone();
                async move {
                    let method = parse_method(&method).map_err(mlua::Error::external)?;
                    perform(lua, transport, method, url, body, opts).await
                }
            },
        )?
    };
    http_tbl.set("request", request)?;

    http_tbl.set("get", bodiless_verb(lua, transport.clone(), Method::GET)?)?;
    http_tbl.set("delete", bodiless_verb(lua, transport.clone(), Method::DELETE)?)?;
    http_tbl.set("post", body_verb(lua, transport.clone(), Method::POST)?)?;
    http_tbl.set("put", body_verb(lua, transport.clone(), Method::PUT)?)?;
    http_tbl.set("patch", body_verb(lua, transport, Method::PATCH)?)?;

    Ok(http_tbl)
}

fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| Error::InvalidMethod(method.to_string()))
}

// verb(url, opts?)
fn bodiless_verb<T: Transport>(
    lua: &Lua,
    transport: Arc<T>,
    method: Method,
) -> mlua::Result<Function> {
    lua.create_async_function(move |lua, (url, opts): (String, Option<Table>)| {
        perform(lua, transport.clone(), method.clone(), url, Value::Nil, opts)
    })
}

// verb(url, body?, opts?)
fn body_verb<T: Transport>(lua: &Lua, transport: Arc<T>, method: Method) -> mlua::Result<Function> {
    lua.create_async_function(
        move |lua, (url, body, opts): (String, Value, Option<Table>)| {
            perform(lua, transport.clone(), method.clone(), url, body, opts)
        },
    )
}

fn encode_body(body: Value) -> Result<Option<(Bytes, &'static str)>> {
    Ok(match body {
        Value::Nil => None,
        Value::String(s) => Some((
            Bytes::copy_from_slice(s.as_bytes().as_ref()),
            TEXT_CONTENT_TYPE,
        )),
        v => Some((Bytes::from(json_util::encode(v)?), JSON_CONTENT_TYPE)),
    })
}

async fn perform<T: Transport>(
    lua: Lua,
    transport: Arc<T>,
    method: Method,
    url: String,
    body: Value,
    opts: Option<Table>,
) -> mlua::Result<Table> {
    let opts = parse_http_opts(opts).map_err(mlua::Error::external)?;
    let request_url = with_query_params(url, &opts.params);

    let mut req = HttpRequest::new(method.clone(), request_url.clone());
    req.headers = opts.headers.clone();
    req.timeout = opts.timeout;

    if let Some((bytes, content_type)) = encode_body(body).map_err(mlua::Error::external)? {
        if !req
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        {
            req.headers
                .push(("content-type".to_string(), content_type.to_string()));
        }
        req.body = bytes;
    }

    let vu_id = vu_api::with_vu(&lua, VuContext::vu_id)?;
    let res = transport.execute(req).await;

    let response = match res {
        Ok(exchange) => {
            let meta = HttpRequestMeta {
                method: method.as_str(),
                name: opts.name.as_deref(),
                group: None,
                tags: &opts.tags,
            };
            vu_api::with_vu(&lua, |vu| {
                vu.record_http_exchange(&meta, &exchange, &opts.response_callback)
            })?;
            HttpLuaResponse::ok(exchange, &request_url)
        }
        Err(err) => {
            tracing::debug!(
                vu = vu_id,
                url = %request_url,
                kind = %err.kind(),
                error = %err,
                "http request failed"
            );
            HttpLuaResponse::err(&err, &request_url)
        }
    };

    response.into_lua_table(&lua)
}
