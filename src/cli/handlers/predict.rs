//! One-shot prediction from the command line.

use anyhow::Result;

use crate::cli::output::{
    colored_label, format_probability, output_json, print_header, print_kv, print_section,
    print_table, OutputMode,
};
use crate::init::AppContext;
use crate::models::emotion::EmotionLabel;
use crate::services::prediction::PredictionReport;

pub async fn handle_predict(ctx: &AppContext, text: &str, mode: OutputMode) -> Result<()> {
    let report = ctx.prediction.predict_detailed(text).await?;

    if mode == OutputMode::Json {
        output_json(&report);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &PredictionReport) {
    let response = &report.response;
    print_header("Prediction");
    print_kv("Emotion", &colored_label(response.predicted_emotion));
    print_kv(
        "Confidence",
        &format_probability(response.probabilities.get(response.predicted_emotion)),
    );
    print_kv("Models agree", if report.unanimous { "yes" } else { "no" });

    let [a, b] = &report.models;
    let mut headers = vec!["Emotion", "Combined"];
    headers.push(&a.model);
    headers.push(&b.model);
    println!();
    print_table(&headers, probability_rows(report));

    print_section("Verse", &response.quranic_verse);
}

fn probability_rows(report: &PredictionReport) -> Vec<Vec<String>> {
    let [a, b] = &report.models;
    EmotionLabel::ALL
        .iter()
        .map(|&label| {
            let marker = if label == report.response.predicted_emotion {
                "*"
            } else {
                ""
            };
            vec![
                format!("{}{}", label, marker),
                format_probability(report.response.probabilities.get(label)),
                format_probability(a.probabilities.get(label)),
                format_probability(b.probabilities.get(label)),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::emotion::ProbabilityVector;
    use crate::services::prediction::{ModelContribution, PredictionResponse};

    fn contribution(model: &str, values: [f32; 4]) -> ModelContribution {
        let probabilities = ProbabilityVector::new(values).unwrap();
        ModelContribution {
            model: model.to_string(),
            predicted: probabilities.argmax(),
            probabilities,
        }
    }

    #[test]
    fn test_probability_rows_mark_prediction() {
        let report = PredictionReport {
            response: PredictionResponse {
                predicted_emotion: EmotionLabel::Fear,
                probabilities: ProbabilityVector::new([0.1, 0.6, 0.2, 0.1]).unwrap(),
                quranic_verse: "fear not (Surah 20, Verse 46)".to_string(),
            },
            models: [
                contribution("bert", [0.1, 0.7, 0.1, 0.1]),
                contribution("roberta", [0.1, 0.5, 0.3, 0.1]),
            ],
            unanimous: true,
        };

        let rows = probability_rows(&report);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][0], "anger");
        assert_eq!(rows[1][0], "fear*");
        assert_eq!(rows[1][1], "60.00%");
        assert_eq!(rows[1][2], "70.00%");
        assert_eq!(rows[2][3], "30.00%");
    }
}
