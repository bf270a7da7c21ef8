use std::sync::Arc;

use mlua::{Lua, Table};
use verdict_core::Transport;

use crate::Result;

mod group;
mod http;
mod wrkr;

fn preload_set(lua: &Lua, name: &str, loader: mlua::Function) -> Result<()> {
    let package: Table = lua.globals().get("package")?;
    let preload: Table = package.get("preload")?;
    preload.set(name, loader)?;
    Ok(())
}

pub fn register<T: Transport>(lua: &Lua, transport: Arc<T>) -> Result<()> {
    http::register_runtime(lua, transport)?;
    group::register(lua)?;
    wrkr::register(lua)?;
    Ok(())
}
