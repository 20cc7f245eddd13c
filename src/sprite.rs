use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{codecs::gif::GifDecoder, AnimationDecoder, GenericImageView};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kitty graphics `f=` values.
pub const FORMAT_RGBA: u32 = 32;
pub const FORMAT_PNG: u32 = 100;

/// Image id used for every placement; one sprite is on screen at a time.
const IMAGE_ID: u32 = 1;
const CHUNK_SIZE: usize = 4096;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteFrame {
    /// Base64 of raw RGBA pixels or of a PNG file, per `format`.
    pub payload: String,
    pub width: u32,
    pub height: u32,
    pub format: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteData {
    pub frames: Vec<SpriteFrame>,
    pub width: u32,
    pub height: u32,
}

impl SpriteData {
    pub fn frame(&self, index: usize) -> Option<&SpriteFrame> {
        if self.frames.is_empty() {
            return None;
        }
        self.frames.get(index % self.frames.len())
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    /// Cell footprint that fits `max_cols` x `max_rows`, keeping the aspect
    /// ratio with terminal cells twice as tall as wide.
    pub fn fit(&self, max_cols: u16, max_rows: u16) -> (u16, u16) {
        const CELL_ASPECT: f32 = 2.0;
        if max_cols == 0 || max_rows == 0 || self.height == 0 {
            return (max_cols, max_rows);
        }
        let ratio = self.width as f32 / self.height as f32;
        let cols_for_rows = ratio * max_rows as f32 * CELL_ASPECT;
        if cols_for_rows <= max_cols as f32 {
            let cols = cols_for_rows.max(1.0).round() as u16;
            return (cols.max(1), max_rows);
        }
        let rows = (max_cols as f32 / (ratio * CELL_ASPECT)).max(1.0).round() as u16;
        (max_cols, rows.clamp(1, max_rows))
    }
}

pub fn decode_sprite(bytes: &[u8], url: &str) -> Result<SpriteData, String> {
    if is_gif(bytes, url) {
        let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(|err| err.to_string())?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .map_err(|err| err.to_string())?;
        let sprite_frames: Vec<SpriteFrame> = frames
            .into_iter()
            .map(|frame| {
                let buffer = frame.into_buffer();
                let (width, height) = buffer.dimensions();
                SpriteFrame {
                    payload: general_purpose::STANDARD.encode(buffer.as_raw()),
                    width,
                    height,
                    format: FORMAT_RGBA,
                }
            })
            .collect();
        if let Some(first) = sprite_frames.first() {
            let (width, height) = (first.width, first.height);
            return Ok(SpriteData {
                frames: sprite_frames,
                width,
                height,
            });
        }
    }

    let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let (width, height) = image.dimensions();
    Ok(SpriteData {
        frames: vec![SpriteFrame {
            payload: general_purpose::STANDARD.encode(bytes),
            width,
            height,
            format: FORMAT_PNG,
        }],
        width,
        height,
    })
}

/// Kitty graphics escape sequence that transmits and places `frame` scaled
/// to `cols` x `rows` cells at the cursor.
pub fn kitty_sequence(frame: &SpriteFrame, cols: u16, rows: u16) -> Result<String, String> {
    let payload = frame.payload.as_bytes();
    let total_chunks = payload.len().div_ceil(CHUNK_SIZE);
    let mut sequence = String::new();

    for (index, chunk) in payload.chunks(CHUNK_SIZE).enumerate() {
        let more = u8::from(index + 1 < total_chunks);
        let chunk = std::str::from_utf8(chunk).map_err(|err| err.to_string())?;
        if index == 0 {
            let mut params = format!(
                "f={},s={},v={},a=T,t=d,i={IMAGE_ID},q=2",
                frame.format, frame.width, frame.height
            );
            if cols > 0 {
                params.push_str(&format!(",c={cols}"));
            }
            if rows > 0 {
                params.push_str(&format!(",r={rows}"));
            }
            sequence.push_str(&format!("\x1b_G{params},m={more};{chunk}\x1b\\"));
        } else {
            sequence.push_str(&format!("\x1b_Gm={more};{chunk}\x1b\\"));
        }
    }
    Ok(sequence)
}

fn is_gif(bytes: &[u8], url: &str) -> bool {
    url.ends_with(".gif") || bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a")
}
