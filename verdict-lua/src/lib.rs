pub use verdict_core::{MetricsContext, VuConfig};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("lua error: {0}")]
    Lua(#[from] mlua::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] verdict_core::Error),

    #[error("expected function `{0}()` in script")]
    MissingExec(String),

    #[error("vu context is not installed in this lua state")]
    MissingVuContext,

    #[error("`response_callback` must be a value returned by expected_statuses() or false")]
    InvalidResponseCallback,

    #[error("`set_response_callback` expects a value returned by expected_statuses(), nil or false")]
    InvalidVuResponseCallback,

    #[error("invalid http method: `{0}`")]
    InvalidMethod(String),

    #[error("`timeout` must be a positive number of seconds or a duration, e.g. 10s, 250ms")]
    InvalidDuration,
}

mod json_util;
mod modules;
mod value_util;
mod vu;
mod vu_api;

pub use vu::LuaVu;
