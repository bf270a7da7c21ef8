use mlua::{Function, Lua, MultiValue};

use crate::Result;
use crate::vu_api;

pub(super) fn register(lua: &Lua) -> Result<()> {
    let loader = lua.create_function(|lua, ()| {
        let t = lua.create_table()?;

        let group = lua.create_async_function(|lua, (name, f): (String, Function)| async move {
            let prev = vu_api::set_current_group(&lua, Some(name))?;

            let res: mlua::Result<MultiValue> = f.call_async(()).await;

            // Always restore, including when `f` raised.
            vu_api::set_current_group(&lua, prev)?;

            res
        })?;

        t.set("group", group)?;
        Ok::<mlua::Table, mlua::Error>(t)
    })?;

    super::preload_set(lua, "wrkr/group", loader)
}
