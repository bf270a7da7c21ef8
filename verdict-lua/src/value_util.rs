use std::sync::Arc;

use mlua::{Table, Value};

const MAX_DEPTH: usize = 16;

/// Converts a Lua argument into a script value for the core.
///
/// Never fails: anything without a counterpart (functions, userdata, threads, tables nested
/// too deep) becomes `Null`, which the core then rejects with its own message.
pub fn lua_to_value(value: &Value) -> verdict_value::Value {
    convert(value, MAX_DEPTH)
}

fn convert(value: &Value, depth: usize) -> verdict_value::Value {
    match value {
        Value::Boolean(b) => verdict_value::Value::Bool(*b),
        Value::Integer(i) => verdict_value::Value::I64(*i),
        Value::Number(n) => verdict_value::Value::F64(*n),
        Value::String(s) => verdict_value::Value::String(Arc::from(s.to_string_lossy())),
        Value::Table(t) if depth > 0 => table_to_value(t, depth - 1),
        _ => verdict_value::Value::Null,
    }
}

// Tables with any string key become objects (non-string keys dropped); others are sequences.
fn table_to_value(t: &Table, depth: usize) -> verdict_value::Value {
    let mut fields = Vec::new();
    let mut saw_string_key = false;
    for (k, v) in t.pairs::<Value, Value>().flatten() {
        if let Value::String(s) = k {
            saw_string_key = true;
            fields.push((s.to_string_lossy().to_string(), convert(&v, depth)));
        }
    }

    if saw_string_key {
        return verdict_value::Value::object(fields);
    }

    let items = t
        .sequence_values::<Value>()
        .flatten()
        .map(|v| convert(&v, depth))
        .collect();
    verdict_value::Value::Array(items)
}
