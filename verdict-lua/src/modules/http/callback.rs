use std::sync::Arc;

use mlua::{MetaMethod, MultiValue, UserData, UserDataMethods, Value};
use verdict_core::{ResponseCallback, StatusMatcher};

use crate::value_util::lua_to_value;
use crate::{Error, Result};

/// Script-side handle to an immutable matcher.
#[derive(Debug, Clone)]
pub(super) struct LuaExpectedStatuses(Arc<StatusMatcher>);

impl UserData for LuaExpectedStatuses {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("matches", |_, this, status: i64| Ok(this.0.matches(status)));
        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| Ok(this.0.to_string()));
    }
}

pub(super) fn expected_statuses(args: &MultiValue) -> Result<LuaExpectedStatuses> {
    let args: Vec<_> = args.iter().map(lua_to_value).collect();
    let matcher = verdict_core::build_expected_statuses(&args)?;
    Ok(LuaExpectedStatuses(Arc::new(matcher)))
}

fn matcher_of(value: &Value) -> Option<Arc<StatusMatcher>> {
    match value {
        Value::UserData(ud) => ud
            .borrow::<LuaExpectedStatuses>()
            .ok()
            .map(|m| m.0.clone()),
        _ => None,
    }
}

/// `response_callback` request option: absent defers to the VU, `false` disables.
pub(super) fn per_request(value: &Value) -> Result<ResponseCallback> {
    match value {
        Value::Nil => Ok(ResponseCallback::UseResolvedDefault),
        Value::Boolean(false) => Ok(ResponseCallback::Disabled),
        v => matcher_of(v)
            .map(ResponseCallback::Matcher)
            .ok_or(Error::InvalidResponseCallback),
    }
}

/// `set_response_callback` argument: `nil` and `false` both disable.
pub(super) fn vu_wide(value: &Value) -> Result<ResponseCallback> {
    match value {
        Value::Nil | Value::Boolean(false) => Ok(ResponseCallback::Disabled),
        v => matcher_of(v)
            .map(ResponseCallback::Matcher)
            .ok_or(Error::InvalidVuResponseCallback),
    }
}
