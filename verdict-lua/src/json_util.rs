use mlua::Value;

use crate::Result;

/// Encodes a Lua value as a JSON request body.
pub fn encode(value: Value) -> Result<String> {
    let mut out = Vec::with_capacity(256);
    let mut serializer = serde_json::Serializer::new(&mut out);
    let deserializer = mlua::serde::de::Deserializer::new(value);
    serde_transcode::transcode(deserializer, &mut serializer).map_err(mlua::Error::external)?;

    let s = String::from_utf8(out).map_err(mlua::Error::external)?;
    Ok(s)
}
