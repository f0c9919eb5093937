use skin_flow::{PatientInfo, PredictionResult};
use std::fmt::Write as _;

pub const DISCLAIMER: &str = "Disclaimer: This tool is for educational purposes only and should not replace professional medical advice. Always consult with a qualified dermatologist for proper diagnosis and treatment.";

const BAR_WIDTH: usize = 30;

pub fn confidence_bar(confidence: u8, width: usize) -> String {
    let filled = (usize::from(confidence.min(100)) * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn patient_line(patient: &PatientInfo) -> String {
    format!("Patient: {}, Age: {}", patient.name, patient.age)
}

/// The result view as plain text
pub fn result_view(patient: &PatientInfo, result: &PredictionResult) -> String {
    let marker = if result.is_reassuring() { "[ok]" } else { "[!]" };

    let mut out = String::new();
    let _ = writeln!(out, "\n== {} Analysis Complete ==", marker);
    let _ = writeln!(out, "{}\n", patient_line(patient));
    let _ = writeln!(out, "Diagnosis:   {}", result.diagnosis);
    let _ = writeln!(
        out,
        "Confidence:  {} {}% confidence",
        confidence_bar(result.confidence, BAR_WIDTH),
        result.confidence
    );
    let _ = writeln!(out, "Urgency:     {}\n", result.urgency);

    for (title, text) in [
        ("Description", &result.description),
        ("Symptoms", &result.symptoms),
        ("Risk Factors", &result.risk_factors),
        ("Treatment Options", &result.treatment),
        ("Medical Recommendation", &result.recommendation),
    ] {
        let _ = writeln!(out, "-- {} --\n{}\n", title, text);
    }

    let _ = writeln!(out, "{}", DISCLAIMER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use skin_flow::CONDITIONS;

    #[test]
    fn test_confidence_bar() {
        assert_eq!(confidence_bar(0, 10), "[----------]");
        assert_eq!(confidence_bar(100, 10), "[##########]");
        assert_eq!(confidence_bar(75, 4), "[###-]");
        assert_eq!(confidence_bar(87, 10), "[#########-]");
    }

    #[test]
    fn test_result_view_sections() {
        let patient = PatientInfo::new("Ada", "36").unwrap();
        let view = result_view(&patient, &CONDITIONS[6].to_prediction(90));

        assert!(view.contains("[ok] Analysis Complete"));
        assert!(view.contains("Patient: Ada, Age: 36"));
        assert!(view.contains("Diagnosis:   Normal Skin"));
        assert!(view.contains("90% confidence"));
        assert!(view.contains("-- Treatment Options --"));
        assert!(view.ends_with(&format!("{}\n", DISCLAIMER)));

        let error_view = result_view(&patient, &PredictionResult::analysis_error());
        assert!(error_view.contains("[!] Analysis Complete"));
        assert!(error_view.contains("Analysis Error"));
    }
}
