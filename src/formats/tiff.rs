use anyhow::{ensure, Result};
use std::io::Cursor;
use tiff::decoder::{Decoder, DecodingResult};

/// Decodes a single channel TIFF image into `(width, height, samples)`.
///
/// Integer samples are normalised by the maximum of their type, floating point
/// samples are kept as they are, since they usually store elevations directly.
pub(crate) fn decode_tiff(bytes: &[u8]) -> Result<(u32, u32, Vec<f32>)> {
    let mut decoder = Decoder::new(Cursor::new(bytes))?;
    let (width, height) = decoder.dimensions()?;

    macro_rules! normalise {
        ($data:expr, $ty:ty) => {
            $data
                .into_iter()
                .map(|sample| sample as f32 / <$ty>::MAX as f32)
                .collect()
        };
    }

    let samples: Vec<f32> = match decoder.read_image()? {
        DecodingResult::U8(data) => normalise!(data, u8),
        DecodingResult::U16(data) => normalise!(data, u16),
        DecodingResult::U32(data) => normalise!(data, u32),
        DecodingResult::U64(data) => normalise!(data, u64),
        DecodingResult::I8(data) => normalise!(data, i8),
        DecodingResult::I16(data) => normalise!(data, i16),
        DecodingResult::I32(data) => normalise!(data, i32),
        DecodingResult::I64(data) => normalise!(data, i64),
        DecodingResult::F32(data) => data,
        DecodingResult::F64(data) => data.into_iter().map(|sample| sample as f32).collect(),
    };

    ensure!(
        samples.len() == width as usize * height as usize,
        "expected a single channel tiff, got {} samples for {width}x{height} pixels",
        samples.len()
    );

    Ok((width, height, samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::{colortype, TiffEncoder};

    #[test]
    fn decodes_normalised_gray16() {
        let data: Vec<u16> = vec![0, u16::MAX, 0, u16::MAX / 2, 0, 0, 0, 0, u16::MAX];
        let mut bytes = Vec::new();

        TiffEncoder::new(Cursor::new(&mut bytes))
            .unwrap()
            .write_image::<colortype::Gray16>(3, 3, &data)
            .unwrap();

        let (width, height, samples) = decode_tiff(&bytes).unwrap();

        assert_eq!((width, height), (3, 3));
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[1], 1.0);
        assert!((samples[3] - 0.5).abs() < 1e-4);
        assert_eq!(samples[8], 1.0);
    }

    #[test]
    fn keeps_float_elevations() {
        let data: Vec<f32> = vec![-12.5, 0.0, 830.25, 1.0];
        let mut bytes = Vec::new();

        TiffEncoder::new(Cursor::new(&mut bytes))
            .unwrap()
            .write_image::<colortype::Gray32Float>(2, 2, &data)
            .unwrap();

        assert_eq!(decode_tiff(&bytes).unwrap().2, data);
    }

    #[test]
    fn rejects_multi_channel_images() {
        let data: Vec<u8> = vec![0; 3 * 4];
        let mut bytes = Vec::new();

        TiffEncoder::new(Cursor::new(&mut bytes))
            .unwrap()
            .write_image::<colortype::RGB8>(2, 2, &data)
            .unwrap();

        assert!(decode_tiff(&bytes).is_err());
    }
}
