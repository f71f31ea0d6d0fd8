//! overlay_demo - decode a synthetic accelerator packet and render its overlay

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use image::ImageFormat;
use ndarray::{ArrayD, IxDyn};
use std::path::PathBuf;

use nnet_overlay::{
    Canvas, DetectedObject, EmotionRecognitionHandler, Frame, HandlerRegistry,
    MobilenetSsdHandler, OverlayConfig, PrimaryDecoder, RecordingCanvas, SecondStageModel,
    TensorPacket,
};

/// Pascal VOC labels, used when the network metadata carries none.
const DEFAULT_LABELS: [&str; 21] = [
    "background",
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Handler to run: mobilenet-ssd or emotion-recognition.
    #[arg(long, default_value = "mobilenet-ssd")]
    network: String,
    /// Frame width in pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,
    /// Frame height in pixels.
    #[arg(long, default_value_t = 480)]
    height: u32,
    /// Decode the raw output tensor instead of the structured detection API.
    #[arg(long)]
    raw: bool,
    /// Output JPEG path.
    #[arg(long, default_value = "overlay.jpg")]
    out: PathBuf,
    /// Print draw commands instead of writing an image.
    #[arg(long)]
    commands: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if args.width == 0 || args.height == 0 {
        return Err(anyhow!("frame dimensions must be non-zero"));
    }

    let mut cfg = OverlayConfig::load()?;
    if cfg.labels.is_empty() {
        cfg.labels = DEFAULT_LABELS.iter().map(|label| label.to_string()).collect();
    }
    let decoder = if args.raw {
        PrimaryDecoder::Raw
    } else {
        cfg.primary_decoder()?
    };
    let context = cfg.overlay_context();
    log::info!("overlay demo starting");
    log::info!("  Network: {}", args.network);
    log::info!("  Decoder: {:?}", decoder);
    log::info!("  Second stage: {:?}", context.second_stage);
    log::info!("  Confidence threshold: {}", context.confidence_threshold);

    let packet = match args.network.as_str() {
        "emotion-recognition" => emotion_packet()?,
        _ => detection_packet(context.second_stage)?,
    };

    let mut registry = HandlerRegistry::new();
    registry.register(MobilenetSsdHandler::new(decoder, context));
    registry.register(EmotionRecognitionHandler::default());

    if args.commands {
        let mut canvas = RecordingCanvas::new(args.width, args.height);
        registry.process(Some(args.network.as_str()), &packet, &mut canvas)?;
        for command in canvas.commands() {
            println!("{:?}", command);
        }
        return Ok(());
    }

    let mut frame = Frame::new(args.width, args.height);
    registry.process(Some(args.network.as_str()), &packet, &mut frame)?;
    let (width, height) = (frame.width(), frame.height());
    frame
        .into_image()
        .save_with_format(&args.out, ImageFormat::Jpeg)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    log::info!("wrote {}x{} overlay to {}", width, height, args.out.display());
    Ok(())
}

fn detection_packet(second_stage: SecondStageModel) -> Result<TensorPacket> {
    let objects = vec![
        DetectedObject {
            label: 15,
            confidence: 0.92,
            x_min: 0.30,
            y_min: 0.20,
            x_max: 0.55,
            y_max: 0.90,
            depth_x: -0.21,
            depth_y: 0.05,
            depth_z: 1.85,
        },
        DetectedObject {
            label: 12,
            confidence: 0.71,
            x_min: 0.60,
            y_min: 0.55,
            x_max: 0.85,
            y_max: 0.95,
            depth_x: 0.42,
            depth_y: 0.31,
            depth_z: 2.40,
        },
        DetectedObject {
            label: 8,
            confidence: 0.22,
            x_min: 0.05,
            y_min: 0.05,
            x_max: 0.15,
            y_max: 0.20,
            depth_x: -0.90,
            depth_y: -0.60,
            depth_z: 4.10,
        },
    ];
    let mut rows: Vec<f32> = Vec::new();
    for object in &objects {
        rows.extend_from_slice(&[
            0.0,
            object.label as f32,
            object.confidence,
            object.x_min,
            object.y_min,
            object.x_max,
            object.y_max,
        ]);
    }
    rows.extend_from_slice(&[-1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let row_count = rows.len() / 7;
    let raw = ArrayD::from_shape_vec(IxDyn(&[1, 1, row_count, 7]), rows)?;

    let mut packet = TensorPacket::new().with_objects(objects).with_tensor(raw);
    match second_stage {
        SecondStageModel::Landmarks => {
            let points = vec![0.31, 0.36, 0.68, 0.35, 0.50, 0.55, 0.36, 0.76, 0.64, 0.75];
            packet = packet.with_tensor(ArrayD::from_shape_vec(IxDyn(&[1, 10, 1, 1]), points)?);
        }
        SecondStageModel::Emotions => {
            let scores = vec![0.08, 0.83, 0.03, 0.04, 0.02];
            packet = packet.with_tensor(ArrayD::from_shape_vec(IxDyn(&[1, 5, 1, 1]), scores)?);
        }
        SecondStageModel::None => {}
    }
    Ok(packet)
}

fn emotion_packet() -> Result<TensorPacket> {
    let scores = vec![0.05, 0.04, 0.06, 0.78, 0.07];
    Ok(TensorPacket::new().with_tensor(ArrayD::from_shape_vec(IxDyn(&[1, 5, 1, 1]), scores)?))
}
