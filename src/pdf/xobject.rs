//! Image XObject encoding
//!
//! Baseline gray/RGB JPEGs are embedded byte-for-byte behind `/DCTDecode`.
//! Everything else is decoded and stored as 8-bit samples behind
//! `/FlateDecode`, with any alpha channel split out into a `/SMask`.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::DynamicImage;
use lopdf::{Dictionary, Object, Stream};

use crate::error::{Error, Result};
use crate::layout::ImageGeometry;
use crate::pdf::probe;
use crate::source::{ImageAsset, ImageFormat};

/// One image ready to be added to a PDF
#[derive(Debug)]
pub struct EncodedImage {
    /// Pixel size and resolution used for page layout
    pub geometry: ImageGeometry,
    /// The image XObject stream
    pub image: Stream,
    /// Alpha channel, when the source has visible transparency
    pub soft_mask: Option<Stream>,
}

/// Decode an asset and build its image XObject.
///
/// Fails when the bytes do not decode as the asset's format.
pub fn encode_asset(asset: &ImageAsset) -> Result<EncodedImage> {
    let decoded = image::load_from_memory_with_format(&asset.contents, asset.format.to_image_format())
        .map_err(|source| Error::Decode {
            path: asset.path.clone(),
            source,
        })?;

    let mut geometry = ImageGeometry::new(decoded.width(), decoded.height());
    if let Some((dpi_x, dpi_y)) = probe::resolution(asset.format, &asset.contents) {
        geometry = geometry.with_dpi(dpi_x, dpi_y);
    }

    if asset.format == ImageFormat::Jpeg {
        let color_space = match probe::jpeg_components(&asset.contents) {
            Some(1) => Some("DeviceGray"),
            Some(3) => Some("DeviceRGB"),
            // CMYK and anything unusual go through the decoder
            _ => None,
        };
        if let Some(color_space) = color_space {
            let mut dict = image_dictionary(geometry, color_space);
            dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
            return Ok(EncodedImage {
                geometry,
                image: raw_stream(dict, asset.contents.clone()),
                soft_mask: None,
            });
        }
    }

    encode_pixels(asset, &decoded, geometry)
}

fn encode_pixels(asset: &ImageAsset, decoded: &DynamicImage, geometry: ImageGeometry) -> Result<EncodedImage> {
    let color = decoded.color();

    let (samples, alpha, color_space) = match (color.has_color(), color.has_alpha()) {
        (true, false) => (decoded.to_rgb8().into_raw(), None, "DeviceRGB"),
        (false, false) => (decoded.to_luma8().into_raw(), None, "DeviceGray"),
        (true, true) => {
            let (rgb, alpha) = split_alpha(&decoded.to_rgba8().into_raw(), 3);
            (rgb, Some(alpha), "DeviceRGB")
        }
        (false, true) => {
            let (luma, alpha) = split_alpha(&decoded.to_luma_alpha8().into_raw(), 1);
            (luma, Some(alpha), "DeviceGray")
        }
    };

    let image = flate_stream(image_dictionary(geometry, color_space), &samples, asset)?;

    // A fully opaque alpha channel adds nothing
    let soft_mask = match alpha {
        Some(alpha) if alpha.iter().any(|&a| a != u8::MAX) => Some(flate_stream(
            image_dictionary(geometry, "DeviceGray"),
            &alpha,
            asset,
        )?),
        _ => None,
    };

    Ok(EncodedImage { geometry, image, soft_mask })
}

/// Split interleaved `channels + 1` samples into colour samples and alpha
fn split_alpha(interleaved: &[u8], channels: usize) -> (Vec<u8>, Vec<u8>) {
    let pixels = interleaved.len() / (channels + 1);
    let mut color = Vec::with_capacity(pixels * channels);
    let mut alpha = Vec::with_capacity(pixels);

    for pixel in interleaved.chunks_exact(channels + 1) {
        color.extend_from_slice(&pixel[..channels]);
        alpha.push(pixel[channels]);
    }

    (color, alpha)
}

fn image_dictionary(geometry: ImageGeometry, color_space: &str) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(geometry.width_px as i64));
    dict.set("Height", Object::Integer(geometry.height_px as i64));
    dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict
}

/// Stream whose content is already encoded and must not be recompressed
fn raw_stream(dict: Dictionary, content: Vec<u8>) -> Stream {
    let mut stream = Stream::new(dict, content);
    stream.allows_compression = false;
    stream
}

fn flate_stream(mut dict: Dictionary, samples: &[u8], asset: &ImageAsset) -> Result<Stream> {
    let encode_error = |source: std::io::Error| Error::Encode {
        path: asset.path.clone(),
        source,
    };

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(samples).map_err(encode_error)?;
    let compressed = encoder.finish().map_err(encode_error)?;

    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    Ok(raw_stream(dict, compressed))
}
