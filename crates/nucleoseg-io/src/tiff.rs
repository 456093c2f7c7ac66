//! TIFF storage for intensity images and label maps
//!
//! Fluorescence images are read as single-channel grayscale of any sample
//! type the `tiff` crate decodes (8/16/32/64-bit integers, 16/32/64-bit
//! floats) and converted to `f32` without rescaling. Label maps must hold
//! unsigned-representable integer samples.
//!
//! Label maps are written as 16-bit grayscale when every label fits, and as
//! 32-bit grayscale otherwise. Images are written as 32-bit float.

use crate::{IoError, IoResult};
use nucleoseg_core::{FImage, LabelMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::TiffEncoder;
use tiff::encoder::colortype::{Gray16, Gray32, Gray32Float};

/// Open `path` for reading, reporting a missing file as [`IoError::NotFound`]
fn open(path: &Path) -> IoResult<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(IoError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Decode the first page of a TIFF, requiring one gray channel
fn decode_gray<R: Read + Seek>(reader: R) -> IoResult<(u32, u32, DecodingResult)> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF dimensions: {}", e)))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF color type: {}", e)))?;

    match color_type {
        ColorType::Gray(8 | 16 | 32 | 64) => {}
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "expected single-channel grayscale of 8 bits or more, got {:?}",
                other
            )));
        }
    }

    let data = decoder
        .read_image()
        .map_err(|e| IoError::DecodeError(format!("Failed to read TIFF image data: {}", e)))?;
    Ok((width, height, data))
}

/// Convert decoded samples to `f32`
fn samples_to_f32(data: DecodingResult) -> Vec<f32> {
    match data {
        DecodingResult::U8(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(|s| s as f32).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|s| s as f32).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(|s| s as f32).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|s| s as f32).collect(),
        DecodingResult::F16(v) => v.into_iter().map(half::f16::to_f32).collect(),
        DecodingResult::F32(v) => v,
        DecodingResult::F64(v) => v.into_iter().map(|s| s as f32).collect(),
    }
}

/// Convert decoded integer samples to labels
fn samples_to_labels(data: DecodingResult) -> IoResult<Vec<u32>> {
    fn convert<T>(v: Vec<T>) -> IoResult<Vec<u32>>
    where
        T: Copy + std::fmt::Display,
        u32: TryFrom<T>,
    {
        v.into_iter()
            .map(|s| {
                u32::try_from(s).map_err(|_| {
                    IoError::UnsupportedFormat(format!("label value {} is not a valid u32", s))
                })
            })
            .collect()
    }

    match data {
        DecodingResult::U8(v) => Ok(v.into_iter().map(u32::from).collect()),
        DecodingResult::U16(v) => Ok(v.into_iter().map(u32::from).collect()),
        DecodingResult::U32(v) => Ok(v),
        DecodingResult::U64(v) => convert(v),
        DecodingResult::I8(v) => convert(v),
        DecodingResult::I16(v) => convert(v),
        DecodingResult::I32(v) => convert(v),
        DecodingResult::I64(v) => convert(v),
        DecodingResult::F16(_) | DecodingResult::F32(_) | DecodingResult::F64(_) => Err(
            IoError::UnsupportedFormat("label maps must hold integer samples".to_string()),
        ),
    }
}

/// Read an intensity image from a TIFF stream
pub fn read_tiff_image<R: Read + Seek>(reader: R) -> IoResult<FImage> {
    let (width, height, data) = decode_gray(reader)?;
    Ok(FImage::from_data(width, height, samples_to_f32(data))?)
}

/// Read a label map from a TIFF stream
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for float samples or for integer
/// samples outside the `u32` range.
pub fn read_tiff_labels<R: Read + Seek>(reader: R) -> IoResult<LabelMap> {
    let (width, height, data) = decode_gray(reader)?;
    Ok(LabelMap::from_data(width, height, samples_to_labels(data)?)?)
}

/// Write an intensity image to a TIFF stream as 32-bit float
pub fn write_tiff_image<W: Write + Seek>(image: &FImage, writer: W) -> IoResult<()> {
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| IoError::EncodeError(format!("TIFF encoder error: {}", e)))?;
    encoder
        .write_image::<Gray32Float>(image.width(), image.height(), image.data())
        .map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))?;
    Ok(())
}

/// Write a label map to a TIFF stream
///
/// Uses 16-bit samples when the largest label fits, 32-bit otherwise.
pub fn write_tiff_labels<W: Write + Seek>(labels: &LabelMap, writer: W) -> IoResult<()> {
    let (width, height) = labels.dimensions();
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| IoError::EncodeError(format!("TIFF encoder error: {}", e)))?;

    let result = match u16::try_from(labels.max_label()) {
        Ok(_) => {
            let data: Vec<u16> = labels.data().iter().map(|&l| l as u16).collect();
            encoder.write_image::<Gray16>(width, height, &data)
        }
        Err(_) => encoder.write_image::<Gray32>(width, height, labels.data()),
    };
    result.map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))
}

/// Read an intensity image from a TIFF file
///
/// # Errors
///
/// Returns [`IoError::NotFound`] if `path` does not exist.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<FImage> {
    let path = path.as_ref();
    let image = read_tiff_image(open(path)?)?;
    log::debug!(
        "read_image: {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Read a label map from a TIFF file
///
/// # Errors
///
/// Returns [`IoError::NotFound`] if `path` does not exist.
pub fn read_label_map<P: AsRef<Path>>(path: P) -> IoResult<LabelMap> {
    read_tiff_labels(open(path.as_ref())?)
}

/// Write an intensity image to a TIFF file, replacing any existing file
pub fn write_image<P: AsRef<Path>>(image: &FImage, path: P) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_tiff_image(image, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a label map to a TIFF file, replacing any existing file
pub fn write_label_map<P: AsRef<Path>>(labels: &LabelMap, path: P) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_tiff_labels(labels, &mut writer)?;
    writer.flush()?;
    Ok(())
}
