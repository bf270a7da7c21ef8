use mlua::Lua;
use verdict_core::VuContext;

use crate::Error;

// Borrows end before returning; callers must not hold one across an await.

pub fn with_vu<R>(lua: &Lua, f: impl FnOnce(&VuContext) -> R) -> mlua::Result<R> {
    let vu = lua
        .app_data_ref::<VuContext>()
        .ok_or_else(|| mlua::Error::external(Error::MissingVuContext))?;
    Ok(f(&vu))
}

pub fn with_vu_mut<R>(lua: &Lua, f: impl FnOnce(&mut VuContext) -> R) -> mlua::Result<R> {
    let mut vu = lua
        .app_data_mut::<VuContext>()
        .ok_or_else(|| mlua::Error::external(Error::MissingVuContext))?;
    Ok(f(&mut vu))
}

pub fn set_current_group(lua: &Lua, group: Option<String>) -> mlua::Result<Option<String>> {
    with_vu_mut(lua, |vu| vu.set_group(group))
}
