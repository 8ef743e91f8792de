//! Code delivery. Production deployments would put an SMTP adapter here;
//! the stock binary logs the code, which is enough for local use and for
//! the test suite.

use async_trait::async_trait;

use domains::{CodeDispatcher, Result};

pub struct LogDispatcher;

#[async_trait]
impl CodeDispatcher for LogDispatcher {
    async fn dispatch(&self, email: &str, code: &str) -> Result<()> {
        tracing::info!(%email, %code, "confirmation code");
        Ok(())
    }
}
