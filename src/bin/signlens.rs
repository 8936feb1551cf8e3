// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 手语识别 (Sign Lens)
///
/// 视频 → 逐帧关键点 → (40, 201) 序列 → 分类 → JSON
///
/// 模型与标签表在启动时加载一次, 之后只读共享;
/// 单次请求的所有错误都转换成 `{"error": ...}` 输出, 不会让进程崩溃
use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use signlens_rs::input::{self, ImageSequenceSource, StagedVideo};
use signlens_rs::models::{HolisticConfig, HolisticOnnx, OnnxSequenceClassifier};
use signlens_rs::{
    Args, LabelEncoder, LabelTable, LocalizedLabels, OrtEP, PipelineConfig, PipelineError,
    PredictionResponse, PredictionResult, SignPipeline,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("signlens_rs=info,signlens=info,ort=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    info!("🚀 手语识别启动");

    let mut config = PipelineConfig::load(&args.config);
    if let Some(stride) = args.stride {
        config.frame_stride = stride;
    }
    config.profile = args.profile;
    config.validate()?;
    config.print_summary();

    let pipeline = build_pipeline(&args, &config)?;
    info!("✅ 系统就绪");

    let response = PredictionResponse::from_outcome(run(&args, &pipeline));
    println!("{}", response.to_json());
    Ok(())
}

/// 加载进程级只读资源: 关键点模型、分类模型、标签表
fn build_pipeline(args: &Args, config: &PipelineConfig) -> Result<SignPipeline> {
    let ep = OrtEP::from_flags(args.trt, args.cuda, args.device_id);

    let detector = HolisticOnnx::new(HolisticConfig {
        model: args.landmark_model.clone(),
        ep,
        input_size: config.landmark_input_size,
        min_detection_confidence: config.min_detection_confidence,
        profile: args.profile,
    })
    .context("关键点模型加载失败")?;

    let classifier =
        OnnxSequenceClassifier::new(&args.model, ep, config.apply_softmax, args.profile)
            .context("分类模型加载失败")?;

    let encoder = LabelEncoder::load(&args.labels)
        .with_context(|| format!("标签文件加载失败: {}", args.labels.display()))?;
    let labels = LabelTable::new(
        encoder,
        LocalizedLabels::new(config.localized_labels.clone()),
    );

    if args.profile {
        use signlens_rs::{LandmarkDetector, SequenceClassifier};
        detector.summary();
        classifier.summary();
    }

    Ok(SignPipeline::new(
        Arc::new(detector),
        Arc::new(classifier),
        Arc::new(labels),
        config,
    ))
}

/// 单次请求
fn run(args: &Args, pipeline: &SignPipeline) -> signlens_rs::Result<PredictionResult> {
    if let Some(dir) = &args.frames_dir {
        return pipeline.predict(ImageSequenceSource::open(dir)?);
    }

    if let Some(path) = &args.video {
        return pipeline.predict(input::open_video(path)?);
    }

    if args.stdin {
        // 临时文件在本作用域结束时删除, 无论推理是否成功
        let staged = StagedVideo::from_reader(io::stdin().lock(), ".webm")?;
        return pipeline.predict(input::open_video(staged.path())?);
    }

    Err(PipelineError::NoInput)
}
