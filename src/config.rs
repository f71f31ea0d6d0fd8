use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::decode::{PrimaryDecoder, SecondStageModel};
use crate::geometry::DepthCalibration;
use crate::render::OverlayContext;

const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
const DEFAULT_PADDING_FACTOR: f32 = 0.3;
const DEFAULT_OUTPUT_FORMAT: &str = "detection";

#[derive(Debug, Deserialize, Default)]
struct PipelineConfigFile {
    depth: Option<DepthConfigFile>,
    ai: Option<AiConfigFile>,
    nn2depth: Option<DepthCalibration>,
}

#[derive(Debug, Deserialize, Default)]
struct DepthConfigFile {
    confidence_threshold: Option<f32>,
    padding_factor: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
struct AiConfigFile {
    blob_file2: Option<String>,
    calc_dist_to_bb: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct NnMetadataFile {
    #[serde(rename = "NN_config")]
    nn_config: Option<NnConfigFile>,
    mappings: Option<MappingsFile>,
}

#[derive(Debug, Deserialize, Default)]
struct NnConfigFile {
    output_format: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct MappingsFile {
    labels: Option<Vec<String>>,
}

/// Resolved pipeline configuration for the overlay.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    pub confidence_threshold: f32,
    pub padding_factor: f32,
    /// Second-stage blob file reference, empty when none is loaded.
    pub blob_file2: String,
    pub calc_dist_to_bb: bool,
    pub depth_calibration: Option<DepthCalibration>,
    pub output_format: String,
    pub labels: Vec<String>,
}

impl OverlayConfig {
    /// Load from `NNET_OVERLAY_CONFIG` and `NNET_OVERLAY_NN_JSON`, then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let pipeline_path = std::env::var("NNET_OVERLAY_CONFIG").ok();
        let nn_path = std::env::var("NNET_OVERLAY_NN_JSON").ok();
        Self::load_from(
            pipeline_path.as_deref().map(Path::new),
            nn_path.as_deref().map(Path::new),
        )
    }

    /// Load from explicit file paths, then apply environment overrides.
    pub fn load_from(pipeline_path: Option<&Path>, nn_path: Option<&Path>) -> Result<Self> {
        let pipeline = match pipeline_path {
            Some(path) => read_json_file(path)?,
            None => PipelineConfigFile::default(),
        };
        let nn = match nn_path {
            Some(path) => read_json_file(path)?,
            None => NnMetadataFile::default(),
        };
        let mut cfg = Self::from_files(pipeline, nn);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_files(pipeline: PipelineConfigFile, nn: NnMetadataFile) -> Self {
        let confidence_threshold = pipeline
            .depth
            .as_ref()
            .and_then(|depth| depth.confidence_threshold)
            .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD);
        let padding_factor = pipeline
            .depth
            .as_ref()
            .and_then(|depth| depth.padding_factor)
            .unwrap_or(DEFAULT_PADDING_FACTOR);
        let blob_file2 = pipeline
            .ai
            .as_ref()
            .and_then(|ai| ai.blob_file2.clone())
            .unwrap_or_default();
        let calc_dist_to_bb = pipeline
            .ai
            .and_then(|ai| ai.calc_dist_to_bb)
            .unwrap_or(false);
        let output_format = nn
            .nn_config
            .and_then(|nn_config| nn_config.output_format)
            .unwrap_or_else(|| DEFAULT_OUTPUT_FORMAT.to_string());
        let labels = nn
            .mappings
            .and_then(|mappings| mappings.labels)
            .unwrap_or_default();
        Self {
            confidence_threshold,
            padding_factor,
            blob_file2,
            calc_dist_to_bb,
            depth_calibration: pipeline.nn2depth,
            output_format,
            labels,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(threshold) = std::env::var("NNET_OVERLAY_CONFIDENCE_THRESHOLD") {
            self.confidence_threshold = threshold.trim().parse().map_err(|_| {
                anyhow!("NNET_OVERLAY_CONFIDENCE_THRESHOLD must be a number between 0 and 1")
            })?;
        }
        if let Ok(padding) = std::env::var("NNET_OVERLAY_PADDING_FACTOR") {
            self.padding_factor = padding.trim().parse().map_err(|_| {
                anyhow!("NNET_OVERLAY_PADDING_FACTOR must be a number between 0 and 1")
            })?;
        }
        if let Ok(blob) = std::env::var("NNET_OVERLAY_BLOB_FILE2") {
            if !blob.trim().is_empty() {
                self.blob_file2 = blob;
            }
        }
        if let Ok(flag) = std::env::var("NNET_OVERLAY_CALC_DIST") {
            self.calc_dist_to_bb = parse_flag(&flag)
                .ok_or_else(|| anyhow!("NNET_OVERLAY_CALC_DIST must be true or false"))?;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(anyhow!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            ));
        }
        if !(0.0..1.0).contains(&self.padding_factor) {
            return Err(anyhow!(
                "padding_factor must be within [0, 1), got {}",
                self.padding_factor
            ));
        }
        self.output_format = self.output_format.trim().to_lowercase();
        self.primary_decoder()?;
        Ok(())
    }

    pub fn primary_decoder(&self) -> Result<PrimaryDecoder> {
        PrimaryDecoder::from_output_format(&self.output_format)
            .ok_or_else(|| anyhow!("unsupported output_format '{}'", self.output_format))
    }

    pub fn second_stage(&self) -> SecondStageModel {
        SecondStageModel::from_blob_file(&self.blob_file2)
    }

    /// Rendering context for every frame of this pipeline.
    pub fn overlay_context(&self) -> OverlayContext {
        OverlayContext {
            confidence_threshold: self.confidence_threshold,
            labels: self.labels.clone(),
            second_stage: self.second_stage(),
            depth: self.depth_calibration,
            padding_factor: self.padding_factor,
            calc_dist_to_bb: self.calc_dist_to_bb,
        }
    }
}

fn read_json_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
