// src/main.rs
//
// Demo entry point: analyze a synthetic shot, print the scorecard and
// drop the session artifacts into an output directory.
//
// Usage: shotform [camera_angle] [output_dir]
//   camera_angle: side | front | other (default side)
//   output_dir:   where session artifacts go (default ./output)

use anyhow::Result;
use tracing::info;

use shotform::engine::AnalysisEngine;
use shotform::export::AngleExporter;
use shotform::narrative::{self, NarrativeClient, NarrativeConfig};
use shotform::pose::{synthetic_shot_sequence, CameraAngle};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let camera = match args.next().as_deref() {
        Some("front") => CameraAngle::Front,
        Some("other") => CameraAngle::Other,
        _ => CameraAngle::Side,
    };
    let output_dir = args.next().unwrap_or_else(|| "output".to_string());

    let sequence = synthetic_shot_sequence(1000.0, 30.0);
    info!(frames = sequence.total_frames, fps = sequence.fps, "running demo analysis");

    let engine = AnalysisEngine::default();
    let mut result = engine.analyze(&sequence, camera)?;

    // Narrative enrichment is opt-in via SHOTFORM_LLM_URL; without it
    // (or on any service failure) the local report stands.
    let narrative_client = match NarrativeConfig::from_env() {
        Some(config) => Some(NarrativeClient::new(config)?),
        None => None,
    };
    result.ai_report =
        Some(narrative::generate_or_fallback(narrative_client.as_ref(), &result).await);

    println!("{}", serde_json::to_string_pretty(&result)?);

    let exporter = AngleExporter::new(&output_dir, None);
    let csv_path = exporter.export_csv(&sequence)?;
    let json_path = exporter.export_result(&result)?;
    info!(csv = %csv_path.display(), json = %json_path.display(), "session artifacts written");

    Ok(())
}
