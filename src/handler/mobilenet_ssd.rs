use anyhow::{anyhow, Result};

use crate::decode::{decode_batch, DecodeError, PrimaryDecoder};
use crate::detect::NnetPacket;
use crate::frame::Canvas;
use crate::handler::{Decoded, NnetHandler};
use crate::render::{render_detections, OverlayContext};

/// SSD-style object detector with an optional second-stage network.
#[derive(Clone, Debug)]
pub struct MobilenetSsdHandler {
    decoder: PrimaryDecoder,
    context: OverlayContext,
}

impl MobilenetSsdHandler {
    pub fn new(decoder: PrimaryDecoder, context: OverlayContext) -> Self {
        Self { decoder, context }
    }

    pub fn context(&self) -> &OverlayContext {
        &self.context
    }
}

impl NnetHandler for MobilenetSsdHandler {
    fn name(&self) -> &'static str {
        "mobilenet-ssd"
    }

    fn decode(&self, packet: &dyn NnetPacket) -> Result<Decoded, DecodeError> {
        decode_batch(
            packet,
            self.decoder,
            self.context.second_stage,
            self.context.confidence_threshold,
        )
        .map(Decoded::Detections)
    }

    fn render(&self, decoded: &Decoded, canvas: &mut dyn Canvas) -> Result<()> {
        match decoded {
            Decoded::Detections(batch) => {
                render_detections(batch, canvas, &self.context);
                Ok(())
            }
            Decoded::Emotions(_) => Err(anyhow!(
                "{} cannot render standalone emotion output",
                self.name()
            )),
        }
    }
}
