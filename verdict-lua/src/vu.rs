use std::sync::Arc;

use mlua::{Lua, Value};
use verdict_core::{ResponseCallback, Transport, VuConfig, VuContext};
use verdict_metrics::Registry;

use crate::modules;
use crate::vu_api;
use crate::{Error, Result};

/// One VU's Lua state.
///
/// The [`VuContext`] lives in the state's app data, so the response callback installed by
/// the script persists across iterations until the script or the runtime changes it.
pub struct LuaVu {
    lua: Lua,
    vu_id: u64,
}

impl LuaVu {
    pub fn new<T: Transport>(
        config: VuConfig,
        metrics: Arc<Registry>,
        script: &str,
        transport: Arc<T>,
    ) -> Result<Self> {
        let vu_id = config.vu_id;
        tracing::debug!(
            vu = vu_id,
            scenario = config.metrics_ctx.scenario(),
            default = %config.default_expected_statuses,
            "initializing lua vu"
        );

        let lua = Lua::new();
        lua.set_app_data(VuContext::new(config, metrics));
        modules::register(&lua, transport)?;
        lua.load(script).set_name("script").exec()?;

        Ok(Self { lua, vu_id })
    }

    #[must_use]
    pub fn vu_id(&self) -> u64 {
        self.vu_id
    }

    /// Runs the global function `exec` once.
    pub async fn run_iteration(&self, exec: &str) -> Result<()> {
        let exec_fn = match self.lua.globals().get::<Value>(exec)? {
            Value::Function(f) => f,
            _ => return Err(Error::MissingExec(exec.to_string())),
        };

        exec_fn.call_async::<()>(()).await?;
        Ok(())
    }

    /// Restores the engine default for subsequent requests.
    pub fn reset_response_callback(&self) -> Result<()> {
        vu_api::with_vu_mut(&self.lua, VuContext::reset_response_callback)?;
        Ok(())
    }

    pub fn response_callback(&self) -> Result<ResponseCallback> {
        Ok(vu_api::with_vu(&self.lua, |vu| vu.response_callback().clone())?)
    }

    pub fn metrics(&self) -> Result<Arc<Registry>> {
        Ok(vu_api::with_vu(&self.lua, |vu| vu.metrics().clone())?)
    }
}
