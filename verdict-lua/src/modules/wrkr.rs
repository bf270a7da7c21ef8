use mlua::{Lua, Table};

use crate::Result;

pub(super) fn register(lua: &Lua) -> Result<()> {
    let loader = lua.create_function(|lua, ()| {
        let t = lua.create_table()?;

        let require: mlua::Function = lua.globals().get("require")?;
        let http: Table = require.call("wrkr/http")?;
        let group: Table = require.call("wrkr/group")?;

        t.set("http", http)?;
        t.set("group", group)?;
        Ok::<Table, mlua::Error>(t)
    })?;

    super::preload_set(lua, "wrkr", loader)
}
