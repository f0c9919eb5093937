use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::{FlowError, Result};

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 120;

/// Name and age as entered on the first step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub age: String,
}

impl PatientInfo {
    /// Validates the form fields. Both must be non-blank and the age must be a
    /// whole number in `MIN_AGE..=MAX_AGE`.
    pub fn new(name: &str, age: &str) -> Result<Self> {
        let name = name.trim();
        let age = age.trim();

        if name.is_empty() {
            return Err(FlowError::MissingField("name"));
        }
        if age.is_empty() {
            return Err(FlowError::MissingField("age"));
        }

        let years = match age.parse::<u8>() {
            Ok(years) if (MIN_AGE..=MAX_AGE).contains(&years) => years,
            _ => return Err(FlowError::InvalidAge(age.to_string())),
        };

        // stored normalised: "+5" and "005" both become "5"
        Ok(Self {
            name: name.to_string(),
            age: years.to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.age.is_empty()
    }
}

/// Image content held in memory as a `data:<mime>;base64,<payload>` URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    data_url: String,
}

impl UploadedImage {
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Result<Self> {
        if !mime.starts_with("image/") {
            return Err(FlowError::UnsupportedMedia(mime.to_string()));
        }
        if bytes.is_empty() {
            return Err(FlowError::EmptyImage);
        }

        Ok(Self {
            data_url: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
        })
    }

    /// Reads an image file, inferring its mime type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime = mime_for_path(path)?;
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(mime, &bytes)
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn mime_type(&self) -> &str {
        self.data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or_default()
    }
}

fn mime_for_path(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        _ => return Err(FlowError::UnsupportedMedia(path.display().to_string())),
    };
    Ok(mime)
}

/// Diagnosis shown on the result step. Field names match the wire format of
/// the predict endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub confidence: u8,
    pub diagnosis: String,
    pub description: String,
    pub symptoms: String,
    pub risk_factors: String,
    pub treatment: String,
    pub urgency: String,
    pub recommendation: String,
}

pub const ANALYSIS_ERROR_DIAGNOSIS: &str = "Analysis Error";
pub const ANALYSIS_ERROR_CONFIDENCE: u8 = 75;

impl PredictionResult {
    /// Placeholder shown when the analysis request fails for any reason other
    /// than the user stopping it.
    pub fn analysis_error() -> Self {
        Self {
            confidence: ANALYSIS_ERROR_CONFIDENCE,
            diagnosis: ANALYSIS_ERROR_DIAGNOSIS.to_string(),
            description: "The image analysis could not be completed due to a technical error."
                .to_string(),
            symptoms: "N/A - Analysis incomplete".to_string(),
            risk_factors: "N/A - Analysis incomplete".to_string(),
            treatment:
                "Please try uploading the image again or consult a healthcare professional"
                    .to_string(),
            urgency: "MODERATE - Try again or seek professional medical advice".to_string(),
            recommendation: "Unable to complete analysis. Please ensure you have a clear image and try again. If the problem persists, consult a dermatologist.".to_string(),
        }
    }

    pub fn is_analysis_error(&self) -> bool {
        self.diagnosis == ANALYSIS_ERROR_DIAGNOSIS
    }

    /// Benign outcomes get the green banner
    pub fn is_reassuring(&self) -> bool {
        matches!(self.diagnosis.as_str(), "Normal Skin" | "Benign Mole (Nevus)")
    }
}

/// Body of `POST /api/predict`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub image: Option<Value>,
}

impl PredictRequest {
    pub fn new(image: &UploadedImage) -> Self {
        Self {
            image: Some(Value::String(image.data_url().to_string())),
        }
    }

    /// Reads the request out of any parsed JSON body. Only the `image` key of
    /// an object is looked at; arrays and scalars carry no image. A literal
    /// `null` body cannot be destructured and yields `None`.
    pub fn from_body(body: &Value) -> Option<Self> {
        match body {
            Value::Null => None,
            body => Some(Self {
                image: body.get("image").cloned(),
            }),
        }
    }

    /// True when the image reference is present and truthy. `null`, `false`,
    /// `0` and `""` count as absent; anything else is accepted uninspected.
    pub fn has_image(&self) -> bool {
        self.image.as_ref().is_some_and(is_truthy)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_info_requires_both_fields() {
        assert!(matches!(
            PatientInfo::new("", "42"),
            Err(FlowError::MissingField("name"))
        ));
        assert!(matches!(
            PatientInfo::new("Ada", "   "),
            Err(FlowError::MissingField("age"))
        ));

        let info = PatientInfo::new("  Ada Lovelace ", " 36").unwrap();
        assert_eq!(info.name, "Ada Lovelace");
        assert_eq!(info.age, "36");
    }

    #[test]
    fn test_patient_age_bounds() {
        for age in ["0", "121", "abc", "-3", "4.5"] {
            assert!(
                matches!(PatientInfo::new("Ada", age), Err(FlowError::InvalidAge(_))),
                "age {age} should be rejected"
            );
        }
        assert!(PatientInfo::new("Ada", "1").is_ok());
        assert!(PatientInfo::new("Ada", "120").is_ok());

        assert_eq!(PatientInfo::new("Ada", "+5").unwrap().age, "5");
        assert_eq!(PatientInfo::new("Ada", "007").unwrap().age, "7");
    }

    #[test]
    fn test_uploaded_image_data_url() {
        let image = UploadedImage::from_bytes("image/png", b"pixels").unwrap();
        assert_eq!(image.data_url(), "data:image/png;base64,cGl4ZWxz");
        assert_eq!(image.mime_type(), "image/png");
    }

    #[test]
    fn test_uploaded_image_rejects_non_images() {
        assert!(matches!(
            UploadedImage::from_bytes("application/pdf", b"%PDF"),
            Err(FlowError::UnsupportedMedia(_))
        ));
        assert!(matches!(
            UploadedImage::from_bytes("image/jpeg", b""),
            Err(FlowError::EmptyImage)
        ));
    }

    #[tokio::test]
    async fn test_uploaded_image_from_path() {
        let dir = std::env::temp_dir().join(format!("skin-flow-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let jpeg = dir.join("lesion.JPG");
        tokio::fs::write(&jpeg, [0xFF, 0xD8, 0xFF]).await.unwrap();
        let image = UploadedImage::from_path(&jpeg).await.unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");

        let notes = dir.join("notes.txt");
        tokio::fs::write(&notes, "hello").await.unwrap();
        assert!(matches!(
            UploadedImage::from_path(&notes).await,
            Err(FlowError::UnsupportedMedia(_))
        ));

        assert!(matches!(
            UploadedImage::from_path(dir.join("missing.png")).await,
            Err(FlowError::Io(_))
        ));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[test]
    fn test_prediction_wire_format() {
        let json = serde_json::to_value(PredictionResult::analysis_error()).unwrap();
        assert_eq!(json["confidence"], 75);
        assert_eq!(json["diagnosis"], "Analysis Error");
        assert!(json["risk_factors"].is_string());
    }

    #[test]
    fn test_predict_request_image_presence() {
        let parse = |body: &str| {
            let body: Value = serde_json::from_str(body).unwrap();
            PredictRequest::from_body(&body)
        };

        for absent in [
            r#"{}"#,
            r#"{"image":null}"#,
            r#"{"image":""}"#,
            r#"{"image":false}"#,
            r#"{"image":0}"#,
            r#"[]"#,
            r#"5"#,
        ] {
            assert!(!parse(absent).unwrap().has_image(), "{absent} has no image");
        }

        for present in [
            r#"{"image":"data:image/png;base64,AA=="}"#,
            r#"{"image":123}"#,
            r#"{"image":true}"#,
            r#"{"image":{}}"#,
        ] {
            assert!(parse(present).unwrap().has_image(), "{present} has an image");
        }

        assert!(parse("null").is_none());
    }

    #[test]
    fn test_predict_request_serializes_data_url() {
        let image = UploadedImage::from_bytes("image/png", b"pixels").unwrap();
        let json = serde_json::to_value(PredictRequest::new(&image)).unwrap();
        assert_eq!(json["image"], "data:image/png;base64,cGl4ZWxz");
    }
}
