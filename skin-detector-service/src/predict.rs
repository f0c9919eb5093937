use skin_flow::{PredictionResult, pick_prediction};
use std::time::Duration;
use tracing::info;

/// Stand-in for a real classifier: waits, then draws from the condition table.
/// The image itself is never inspected.
#[derive(Debug, Clone)]
pub struct Predictor {
    delay: Duration,
}

impl Predictor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn predict(&self) -> PredictionResult {
        tokio::time::sleep(self.delay).await;

        let prediction = pick_prediction(&mut rand::rng());
        info!(
            diagnosis = %prediction.diagnosis,
            confidence = prediction.confidence,
            "Prediction made"
        );
        prediction
    }
}
