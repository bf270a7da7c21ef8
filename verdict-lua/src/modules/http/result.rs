use bytes::Bytes;
use mlua::{Lua, Table};
use verdict_core::{HttpExchange, TransportError};

pub(super) struct HttpLuaResponse {
    pub(super) status: u16,
    pub(super) url: String,
    pub(super) body: Bytes,
    pub(super) headers: Vec<(String, String)>,
    pub(super) error: Option<String>,
}

impl HttpLuaResponse {
    /// Status and url come from the final hop, after redirects.
    pub(super) fn ok(exchange: HttpExchange, request_url: &str) -> Self {
        let (status, url) = exchange
            .final_hop()
            .map_or((0, request_url.to_string()), |hop| (hop.status, hop.url.clone()));

        Self {
            status,
            url,
            body: exchange.body,
            headers: exchange.headers,
            error: None,
        }
    }

    pub(super) fn err(err: &TransportError, request_url: &str) -> Self {
        Self {
            status: 0,
            url: request_url.to_string(),
            body: Bytes::new(),
            headers: Vec::new(),
            error: Some(err.to_string()),
        }
    }

    pub(super) fn into_lua_table(self, lua: &Lua) -> mlua::Result<Table> {
        let t = lua.create_table()?;
        t.set("status", self.status)?;
        t.set("url", self.url)?;
        t.set("body", lua.create_string(&self.body)?)?;

        let headers_tbl = lua.create_table()?;
        for (k, v) in self.headers {
            headers_tbl.set(k, v)?;
        }
        t.set("headers", headers_tbl)?;

        if let Some(error) = self.error {
            t.set("error", error)?;
        }
        Ok(t)
    }
}
