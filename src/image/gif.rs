//! GIF via the `gif` crate
//!
//! Frames are quantized per frame with the crate's NeuQuant path; speed 10
//! matches the encoder's own default.

use gif::{Encoder, Frame, Repeat};

use crate::types::{ChannelLayout, FixtureError, FixtureResult, PixelBuffer};

const QUANTIZE_SPEED: i32 = 10;

/// Per-frame timing and looping for an animated GIF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    /// Display time of every frame, stored as centiseconds
    pub delay_ms: u32,
    /// 0 repeats forever
    pub loop_count: u16,
}

impl Animation {
    /// Delay in the 1/100 s units the GIF graphic control block stores
    pub fn delay_centis(&self) -> u16 {
        u16::try_from(self.delay_ms / 10).unwrap_or(u16::MAX)
    }

    fn repeat(&self) -> Repeat {
        match self.loop_count {
            0 => Repeat::Infinite,
            n => Repeat::Finite(n),
        }
    }
}

/// Single-frame GIF
pub fn encode_gif(buffer: &PixelBuffer) -> FixtureResult<Vec<u8>> {
    encode_frames(core::slice::from_ref(buffer), None)
}

/// Animated GIF; every frame must share the first frame's dimensions
pub fn encode_animated_gif(frames: &[PixelBuffer], animation: Animation) -> FixtureResult<Vec<u8>> {
    encode_frames(frames, Some(animation))
}

fn encode_frames(frames: &[PixelBuffer], animation: Option<Animation>) -> FixtureResult<Vec<u8>> {
    let first = frames
        .first()
        .ok_or_else(|| FixtureError::invalid("GIF needs at least one frame"))?;
    let (width, height) = gif_dimensions(first)?;

    if let Some(mismatch) = frames
        .iter()
        .find(|f| f.width() != first.width() || f.height() != first.height())
    {
        return Err(FixtureError::invalid(format!(
            "GIF frame is {}x{}, expected {}x{}",
            mismatch.width(),
            mismatch.height(),
            first.width(),
            first.height()
        )));
    }

    let mut encoder =
        Encoder::new(Vec::new(), width, height, &[]).map_err(|e| FixtureError::codec("GIF", e))?;
    if let Some(anim) = animation {
        encoder.set_repeat(anim.repeat()).map_err(|e| FixtureError::codec("GIF", e))?;
    }

    for buffer in frames {
        let mut frame = match buffer.layout() {
            ChannelLayout::Rgb => Frame::from_rgb_speed(width, height, buffer.as_bytes(), QUANTIZE_SPEED),
            ChannelLayout::Rgba => {
                let mut rgba = buffer.as_bytes().to_vec();
                Frame::from_rgba_speed(width, height, &mut rgba, QUANTIZE_SPEED)
            }
        };
        if let Some(anim) = animation {
            frame.delay = anim.delay_centis();
        }
        encoder.write_frame(&frame).map_err(|e| FixtureError::codec("GIF", e))?;
    }

    encoder.into_inner().map_err(|e| FixtureError::codec("GIF", e))
}

fn gif_dimensions(buffer: &PixelBuffer) -> FixtureResult<(u16, u16)> {
    let width = u16::try_from(buffer.width())
        .map_err(|_| FixtureError::invalid(format!("GIF width {} exceeds 65535", buffer.width())))?;
    let height = u16::try_from(buffer.height())
        .map_err(|_| FixtureError::invalid(format!("GIF height {} exceeds 65535", buffer.height())))?;
    Ok((width, height))
}

pub fn is_gif(data: &[u8]) -> bool {
    data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a")
}
