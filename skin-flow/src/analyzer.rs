use async_trait::async_trait;

use crate::{error::Result, models::PredictionResult, models::UploadedImage};

/// Anything that can turn an uploaded image into a diagnosis
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, image: &UploadedImage) -> Result<PredictionResult>;
}

#[cfg(feature = "http")]
pub use http::HttpAnalyzer;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;
    use reqwest::Client;
    use tracing::{info, warn};

    use super::Analyzer;
    use crate::{
        error::{FlowError, Result},
        models::{PredictRequest, PredictionResult, UploadedImage},
    };

    pub const PREDICT_PATH: &str = "/api/predict";

    /// Calls the predict endpoint of a running detector service
    #[derive(Debug, Clone)]
    pub struct HttpAnalyzer {
        client: Client,
        endpoint: String,
    }

    impl HttpAnalyzer {
        pub fn new(base_url: &str) -> Self {
            Self::with_client(Client::new(), base_url)
        }

        pub fn with_client(client: Client, base_url: &str) -> Self {
            Self {
                client,
                endpoint: format!("{}{}", base_url.trim_end_matches('/'), PREDICT_PATH),
            }
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    #[async_trait]
    impl Analyzer for HttpAnalyzer {
        async fn analyze(&self, image: &UploadedImage) -> Result<PredictionResult> {
            info!(
                endpoint = %self.endpoint,
                mime_type = %image.mime_type(),
                payload_len = image.data_url().len(),
                "Sending image for analysis"
            );

            let response = self
                .client
                .post(&self.endpoint)
                .json(&PredictRequest::new(image))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                warn!(status = %status, "Analysis endpoint rejected the request");
                return Err(FlowError::Status(status.as_u16()));
            }

            let result: PredictionResult = response.json().await?;
            info!(
                diagnosis = %result.diagnosis,
                confidence = result.confidence,
                "Analysis completed"
            );
            Ok(result)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_endpoint_joins_base_url() {
            assert_eq!(
                HttpAnalyzer::new("http://localhost:3000/").endpoint(),
                "http://localhost:3000/api/predict"
            );
            assert_eq!(
                HttpAnalyzer::new("http://localhost:3000").endpoint(),
                "http://localhost:3000/api/predict"
            );
        }

        #[tokio::test]
        async fn test_connection_refused_is_request_error() {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let analyzer = HttpAnalyzer::new(&format!("http://{}", addr));
            let image = UploadedImage::from_bytes("image/png", b"pixels").unwrap();

            let result = analyzer.analyze(&image).await;
            assert!(matches!(result, Err(FlowError::Request(_))));
        }
    }
}
