pub mod analyzer;
pub mod conditions;
pub mod error;
pub mod models;
pub mod runner;
pub mod step;
pub mod wizard;

// Re-export commonly used types
pub use analyzer::Analyzer;
#[cfg(feature = "http")]
pub use analyzer::HttpAnalyzer;
pub use conditions::{CONDITIONS, CONFIDENCE_RANGE, ConditionRecord, pick_prediction};
pub use error::{FlowError, Result};
pub use models::{PatientInfo, PredictRequest, PredictionResult, UploadedImage};
pub use runner::AnalysisRunner;
pub use step::Step;
pub use wizard::{AnalysisOutcome, AnalysisTicket, Wizard};

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct TableAnalyzer;

    #[async_trait]
    impl Analyzer for TableAnalyzer {
        async fn analyze(&self, _image: &UploadedImage) -> Result<PredictionResult> {
            Ok(pick_prediction(&mut rand::rng()))
        }
    }

    #[tokio::test]
    async fn test_full_wizard_cycle() {
        let wizard = Arc::new(Mutex::new(Wizard::new()));
        let runner = AnalysisRunner::new(wizard.clone(), Arc::new(TableAnalyzer));

        for round in 0..3 {
            {
                let mut wizard = wizard.lock().await;
                wizard
                    .submit_patient_info("Rosalind Franklin", "37")
                    .unwrap();
                wizard
                    .upload_image(UploadedImage::from_bytes("image/webp", &[round]).unwrap())
                    .unwrap();
            }

            runner.run().await.unwrap();

            let mut wizard = wizard.lock().await;
            assert_eq!(wizard.step(), Step::Result);
            let result = wizard.result().unwrap();
            assert!(CONFIDENCE_RANGE.contains(&result.confidence));
            assert!(conditions::is_known_label(&result.diagnosis));

            wizard.return_home().unwrap();
        }
    }
}
