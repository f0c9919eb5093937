//! AnalysisRunner – convenience wrapper that drives **one** analysis request for a shared
//! wizard: begin the request, await it without holding the wizard lock, and commit the outcome.
//!
//! Front ends keep the wizard behind an `Arc<Mutex<Wizard>>` so that a "stop" action can
//! reach it while the request is pending:
//!
//! ```text
//! let runner = AnalysisRunner::new(wizard.clone(), analyzer);
//! tokio::select! {
//!     outcome = runner.run() => { /* predict -> result */ }
//!     _ = user_pressed_stop() => runner.stop().await?,   // predict -> upload
//! }
//! ```
//!
//! Dropping the `run()` future is not enough to leave the predict step; always call
//! [`AnalysisRunner::stop`].

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    analyzer::Analyzer,
    error::Result,
    wizard::{AnalysisOutcome, Wizard},
};

#[derive(Clone)]
pub struct AnalysisRunner {
    wizard: Arc<Mutex<Wizard>>,
    analyzer: Arc<dyn Analyzer>,
}

impl AnalysisRunner {
    pub fn new(wizard: Arc<Mutex<Wizard>>, analyzer: Arc<dyn Analyzer>) -> Self {
        Self { wizard, analyzer }
    }

    pub fn wizard(&self) -> &Arc<Mutex<Wizard>> {
        &self.wizard
    }

    /// Runs the analysis for the wizard's current image.
    ///
    /// Fails only if the wizard is not ready to predict. Request failures are reported as
    /// [`AnalysisOutcome::Failed`] and leave the wizard on the result step with the fallback
    /// diagnosis.
    pub async fn run(&self) -> Result<AnalysisOutcome> {
        // 1. upload -> predict
        let ticket = self.wizard.lock().await.begin_analysis()?;
        let ticket_id = ticket.id();

        // 2. the request itself; stop() may run meanwhile
        let outcome = ticket.run(self.analyzer.as_ref()).await;

        // 3. predict -> result, unless the ticket was stopped
        let committed = self
            .wizard
            .lock()
            .await
            .finish_analysis(ticket_id, &outcome);
        info!(ticket_id = %ticket_id, committed, "Analysis finished");

        Ok(outcome)
    }

    /// Aborts the in-flight request and returns the wizard to the upload step
    pub async fn stop(&self) -> Result<()> {
        self.wizard.lock().await.stop_analysis()
    }
}
