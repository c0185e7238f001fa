use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use verivoice::application::ports::AudioClassifier;
use verivoice::application::services::{AudioIngest, DecisionPolicy, DetectionService};
use verivoice::infrastructure::audio::SymphoniaAudioDecoder;
use verivoice::infrastructure::classifier::CandleVoiceClassifier;
use verivoice::infrastructure::observability::{init_tracing, TracingConfig};
use verivoice::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    init_tracing(TracingConfig::default(), settings.server.port);

    tracing::info!(
        environment = %settings.server.environment,
        model = %settings.model.model_id,
        "Starting AI voice detection service"
    );

    // Model load is a startup precondition: refuse to serve without it.
    let classifier = Arc::new(
        CandleVoiceClassifier::new(
            &settings.model.model_id,
            Some(settings.model.cache_dir.clone()),
            settings.model.use_gpu,
            settings.audio.sample_rate,
        )
        .context("failed to load detection model")?,
    );

    let sample_rate = classifier.sampling_rate();
    let decoder = Arc::new(SymphoniaAudioDecoder::new(sample_rate));

    let ingest = AudioIngest::new(
        Arc::clone(&decoder),
        settings.audio.max_size_mb,
        sample_rate,
    );
    let policy = DecisionPolicy::new(
        settings.detection.confidence_threshold,
        settings.detection.language_thresholds.clone(),
        settings.detection.ai_label_tokens.clone(),
    );
    let detection_service = Arc::new(DetectionService::new(
        Arc::clone(&classifier),
        ingest,
        policy,
        Duration::from_secs(settings.detection.request_timeout_secs),
    ));

    let host: IpAddr = settings
        .server
        .host
        .parse()
        .context("invalid server host")?;
    let addr = SocketAddr::new(host, settings.server.port);

    let state = AppState {
        detection_service,
        settings,
    };

    let router = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
