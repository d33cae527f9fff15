use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Stream};
use std::io::Write;

use crate::model::RecipeImage;
use crate::ConvertError;

/// A recipe image decoded to 8-bit RGB and deflated for an image XObject
#[derive(Debug)]
pub struct PdfImage {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl PdfImage {
    /// Decodes the embedded image. Transparent pixels are composited onto white.
    pub fn decode(image: &RecipeImage) -> Result<Self, ConvertError> {
        let decoded = image::load_from_memory_with_format(&image.data, image.format)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = a as u32;
            for channel in [r, g, b] {
                let blended = (channel as u32 * alpha + 255 * (255 - alpha)) / 255;
                rgb.push(blended as u8);
            }
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&rgb)?;
        let data = encoder.finish()?;

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Size in points when drawn at one point per pixel and shrunk to fit
    /// into a `max` × `max` box. Small images are never enlarged.
    pub fn fitted_size(&self, max: f32) -> (f32, f32) {
        let (w, h) = (self.width as f32, self.height as f32);
        let scale = (max / w).min(max / h).min(1.0);
        (w * scale, h * scale)
    }

    pub fn into_stream(self) -> Stream {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        Stream::new(dict, self.data).with_compression(false)
    }
}
