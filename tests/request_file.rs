use rootsphere::config::Config;
use rootsphere::datasources::ModelStore;
use rootsphere::logic::RecommendationService;
use rootsphere::models::{
    FertilizerAction, IrrigationAction, NpkDose, Recommendation, RecommendationRequest,
};
use std::path::PathBuf;
use std::sync::Arc;

fn demo_request() -> RecommendationRequest {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/request.json");
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn recommend_without_models(request: &RecommendationRequest) -> Recommendation {
    let tmp = tempfile::tempdir().unwrap();
    let store = Arc::new(ModelStore::open(tmp.path()));
    RecommendationService::from_store(store, &Config::default()).handle(request)
}

#[test]
fn demo_request_without_models() {
    let rec = recommend_without_models(&demo_request());

    assert_eq!(rec.field_id, "plot-12");
    assert_eq!(rec.irrigation_action, IrrigationAction::IrrigateNow);
    assert_eq!(rec.irrigation_liters_per_acre, 500.0);
    assert_eq!(rec.fertilizer_action, FertilizerAction::Apply);
    assert_eq!(rec.fertilizer_npk_kg_acre, NpkDose::new(50.0, 30.0, 20.0));
    assert_eq!(rec.classifier_label, "Model Not Available");
    assert_eq!(rec.data_completeness, 0.8);
    assert!(rec.model_forecast_mm.is_none());
    assert_eq!(rec.rain_history_mm.as_ref().map(Vec::len), Some(7));
    assert!(rec
        .rationale
        .contains(&"Consider lime application to raise pH.".to_string()));
}

#[test]
fn output_uses_wire_names() {
    let rec = recommend_without_models(&demo_request());
    let json: serde_json::Value = serde_json::to_value(&rec).unwrap();

    assert_eq!(json["irrigation_action"], "IRRIGATE_NOW");
    assert_eq!(json["fertilizer_action"], "APPLY");
    assert_eq!(json["generated_at"], "2025-11-04T06:00:00Z");
    assert!(json.get("risk_alert").is_none());
}

#[test]
fn learned_model_on_disk_changes_arbitration() {
    let tmp = tempfile::tempdir().unwrap();
    // Predicts 4 mm tomorrow regardless of history
    let model = serde_json::json!({
        "field_id": "plot-12",
        "scaler": { "min": [0.0, 0.0, 0.0, 0.0], "max": [50.0, 40.0, 100.0, 100.0] },
        "weights": [vec![0.0; 28], vec![0.0; 28], vec![0.0; 28]],
        "bias": [0.04, 0.0, 0.0]
    });
    std::fs::write(
        tmp.path().join("model_plot-12.json"),
        serde_json::to_string(&model).unwrap(),
    )
    .unwrap();

    let store = Arc::new(ModelStore::open(tmp.path()));
    let rec = RecommendationService::from_store(store, &Config::default()).handle(&demo_request());

    assert_eq!(rec.irrigation_action, IrrigationAction::Delay);
    assert_eq!(rec.irrigation_timing, "after rain");
    assert!(rec.model_forecast_mm.is_some());
}
