//! The four-step detector wizard.
//!
//! `Wizard` is a plain state machine: every user action is a method that
//! either performs its transition or fails with
//! [`FlowError::InvalidTransition`] and leaves the state untouched. The only
//! asynchronous piece, the analysis request, is split out into an
//! [`AnalysisTicket`] so that the wizard never has to be borrowed while the
//! request is in flight:
//!
//! ```text
//! let ticket = wizard.begin_analysis()?;          // upload -> predict
//! let id = ticket.id();
//! let outcome = ticket.run(&analyzer).await;       // wizard is free here
//! wizard.finish_analysis(id, &outcome);            // predict -> result
//! ```
//!
//! `stop_analysis` aborts the ticket's request and returns to the upload
//! step; a late `finish_analysis` for that ticket is then ignored.

use futures::future::{AbortHandle, AbortRegistration, Abortable};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    analyzer::Analyzer,
    error::{FlowError, Result},
    models::{PatientInfo, PredictionResult, UploadedImage},
    step::Step,
};

#[derive(Debug)]
struct InFlight {
    ticket_id: Uuid,
    abort: AbortHandle,
}

#[derive(Debug, Default)]
pub struct Wizard {
    step: Step,
    patient: PatientInfo,
    image: Option<UploadedImage>,
    result: Option<PredictionResult>,
    in_flight: Option<InFlight>,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn patient(&self) -> &PatientInfo {
        &self.patient
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.in_flight.is_some()
    }

    fn expect_step(&self, allowed: &[Step], action: &'static str) -> Result<()> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(FlowError::InvalidTransition {
                step: self.step,
                action,
            })
        }
    }

    /// info -> upload
    pub fn submit_patient_info(&mut self, name: &str, age: &str) -> Result<()> {
        self.expect_step(&[Step::Info], "submit patient info")?;
        self.patient = PatientInfo::new(name, age)?;
        self.step = Step::Upload;
        info!(age = %self.patient.age, "Patient info accepted");
        Ok(())
    }

    /// Stores or replaces the image; stays on the upload step
    pub fn upload_image(&mut self, image: UploadedImage) -> Result<()> {
        self.expect_step(&[Step::Upload], "upload image")?;
        info!(
            mime_type = %image.mime_type(),
            replaced = self.image.is_some(),
            "Image selected"
        );
        self.image = Some(image);
        Ok(())
    }

    /// upload -> predict. The returned ticket must be run and then handed
    /// back through [`Wizard::finish_analysis`].
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket> {
        self.expect_step(&[Step::Upload], "predict")?;
        let image = self.image.clone().ok_or(FlowError::NoImage)?;

        let (abort, registration) = AbortHandle::new_pair();
        let ticket_id = Uuid::new_v4();
        self.in_flight = Some(InFlight { ticket_id, abort });
        self.step = Step::Predict;

        info!(ticket_id = %ticket_id, "Analysis started");
        Ok(AnalysisTicket {
            id: ticket_id,
            image,
            registration,
        })
    }

    /// predict -> result. Returns `false` when the outcome was not committed:
    /// the ticket is stale, the analysis was stopped, or the wizard already
    /// left the predict step.
    pub fn finish_analysis(&mut self, ticket_id: Uuid, outcome: &AnalysisOutcome) -> bool {
        let current = self.in_flight.as_ref().map(|in_flight| in_flight.ticket_id);
        if self.step != Step::Predict || current != Some(ticket_id) {
            debug!(ticket_id = %ticket_id, step = %self.step, "Ignoring stale analysis outcome");
            return false;
        }

        self.in_flight = None;
        match outcome {
            AnalysisOutcome::Completed(result) => {
                self.result = Some(result.clone());
                self.step = Step::Result;
                true
            }
            AnalysisOutcome::Failed(error) => {
                warn!(ticket_id = %ticket_id, error = %error, "Analysis failed, showing fallback result");
                self.result = Some(PredictionResult::analysis_error());
                self.step = Step::Result;
                true
            }
            AnalysisOutcome::Cancelled => {
                self.step = Step::Upload;
                false
            }
        }
    }

    /// predict -> upload. Aborts the in-flight request, keeps the image.
    pub fn stop_analysis(&mut self) -> Result<()> {
        self.expect_step(&[Step::Predict], "stop analysis")?;
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort.abort();
            info!(ticket_id = %in_flight.ticket_id, "Analysis stopped by user");
        }
        self.step = Step::Upload;
        Ok(())
    }

    /// result -> upload (also clears a selected image on the upload step)
    pub fn upload_again(&mut self) -> Result<()> {
        self.expect_step(&[Step::Upload, Step::Result], "upload again")?;
        self.image = None;
        self.result = None;
        self.step = Step::Upload;
        Ok(())
    }

    /// result -> info, forgetting everything
    pub fn return_home(&mut self) -> Result<()> {
        self.expect_step(&[Step::Result], "return home")?;
        self.patient = PatientInfo::default();
        self.image = None;
        self.result = None;
        self.step = Step::Info;
        Ok(())
    }
}

/// A single analysis request, detached from the wizard
#[derive(Debug)]
pub struct AnalysisTicket {
    id: Uuid,
    image: UploadedImage,
    registration: AbortRegistration,
}

impl AnalysisTicket {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn image(&self) -> &UploadedImage {
        &self.image
    }

    /// Runs the request until it completes or the wizard stops it
    pub async fn run<A: Analyzer + ?Sized>(self, analyzer: &A) -> AnalysisOutcome {
        let AnalysisTicket {
            id,
            image,
            registration,
        } = self;

        match Abortable::new(analyzer.analyze(&image), registration).await {
            Ok(Ok(result)) => AnalysisOutcome::Completed(result),
            Ok(Err(error)) => AnalysisOutcome::Failed(error),
            Err(_aborted) => {
                debug!(ticket_id = %id, "Analysis request aborted");
                AnalysisOutcome::Cancelled
            }
        }
    }
}

#[derive(Debug)]
pub enum AnalysisOutcome {
    Completed(PredictionResult),
    /// The request failed; the wizard shows the fallback result
    Failed(FlowError),
    /// The user stopped the analysis
    Cancelled,
}
