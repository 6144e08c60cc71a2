use anyhow::Result;

/// Decodes any image format supported by the `image` crate into normalised luminance samples.
pub(crate) fn decode_grayscale(bytes: &[u8]) -> Result<(u32, u32, Vec<f32>)> {
    let image = image::load_from_memory(bytes)?.into_luma16();
    let (width, height) = image.dimensions();

    let samples = image
        .into_raw()
        .into_iter()
        .map(|sample| sample as f32 / u16::MAX as f32)
        .collect();

    Ok((width, height, samples))
}
