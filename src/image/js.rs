//! JavaScript bindings for [`IntegerImage`] (`Uint16Image`) and
//! [`FloatImage`] (`Float16Image`).
//!
//! Half float channels cross the boundary as JavaScript numbers.

use half::f16;
use js_sys::{Array, Function, Uint16Array};
use wasm_bindgen::prelude::*;

use super::{FloatImage, HdrImage, IntegerImage};
use crate::color::{
    convert_array_to_rec2100_hlg, convert_pixel_to_rec2100_hlg, rescale_array_to_f16,
    scale_u8_to_u16, HdrColorSpace,
};
use crate::error::HdrCanvasError;
use crate::interop::{float16_array, image_data_from_js, image_data_to_js};
use crate::loader;
use crate::types::ImageDataPixelFormat;

type JsResult<T> = std::result::Result<T, JsValue>;

/// Unknown pixel format names fall back to the variant default.
fn pixel_format_or_default<I: HdrImage>(name: Option<String>) -> Option<ImageDataPixelFormat> {
    name.map(|n| ImageDataPixelFormat::parse_or(Some(&n), I::DEFAULT_PIXEL_FORMAT))
}

fn parse_options<I: HdrImage>(
    color_space: Option<String>,
    pixel_format: Option<String>,
) -> JsResult<(Option<HdrColorSpace>, Option<ImageDataPixelFormat>)> {
    let color_space = color_space.map(|s| s.parse()).transpose()?;
    Ok((color_space, pixel_format_or_default::<I>(pixel_format)))
}

fn check_bounds<I: HdrImage>(image: &I, x: u32, y: u32) -> JsResult<()> {
    if x >= image.width() || y >= image.height() {
        return Err(JsValue::from_str(&format!(
            "pixel ({}, {}) outside {}x{} image",
            x,
            y,
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

fn to_pixel<C: Copy>(px: &[C]) -> JsResult<[C; 4]> {
    match px {
        &[r, g, b, a] => Ok([r, g, b, a]),
        _ => Err(HdrCanvasError::DataLengthMismatch {
            expected: 4,
            actual: px.len(),
        }
        .into()),
    }
}

/// Runs a JavaScript `(r, g, b, a) => [r, g, b, a]` callback over every pixel.
///
/// Stops at the first exception; pixels already visited keep their new values.
fn apply_pixel_callback<I: HdrImage>(
    image: &mut I,
    f: &Function,
    to_js: fn(I::Channel) -> JsValue,
    from_js: fn(f64) -> I::Channel,
) -> JsResult<()> {
    for px in image.data_mut().chunks_exact_mut(4) {
        let args = Array::of4(&to_js(px[0]), &to_js(px[1]), &to_js(px[2]), &to_js(px[3]));
        let out = Array::from(&f.apply(&JsValue::NULL, &args)?);
        for (i, channel) in px.iter_mut().enumerate() {
            let value = out.get(i as u32).as_f64().ok_or_else(|| {
                JsValue::from_str("pixel callback must return four numeric channels")
            })?;
            *channel = from_js(value);
        }
    }
    Ok(())
}

fn clamp_u16(v: f64) -> u16 {
    v.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

#[wasm_bindgen(js_class = Uint16Image)]
impl IntegerImage {
    #[wasm_bindgen(constructor)]
    pub fn js_new(
        width: u32,
        height: u32,
        color_space: Option<String>,
        pixel_format: Option<String>,
    ) -> JsResult<IntegerImage> {
        let (color_space, pixel_format) = parse_options::<Self>(color_space, pixel_format)?;
        Ok(IntegerImage::new(width, height, color_space, pixel_format))
    }

    #[wasm_bindgen(getter = width)]
    pub fn js_width(&self) -> u32 {
        self.width()
    }

    #[wasm_bindgen(getter = height)]
    pub fn js_height(&self) -> u32 {
        self.height()
    }

    #[wasm_bindgen(getter = colorSpace)]
    pub fn js_color_space(&self) -> String {
        self.color_space().to_string()
    }

    #[wasm_bindgen(getter = pixelFormat)]
    pub fn js_pixel_format(&self) -> String {
        self.pixel_format().to_string()
    }

    /// A copy of the channel buffer.
    #[wasm_bindgen(getter = data)]
    pub fn js_data(&self) -> Uint16Array {
        Uint16Array::from(self.data())
    }

    #[wasm_bindgen(js_name = getPixel)]
    pub fn js_get_pixel(&self, x: u32, y: u32) -> JsResult<Vec<u16>> {
        check_bounds(self, x, y)?;
        Ok(self.get_pixel(x, y).to_vec())
    }

    #[wasm_bindgen(js_name = setPixel)]
    pub fn js_set_pixel(&mut self, x: u32, y: u32, px: Vec<u16>) -> JsResult<()> {
        check_bounds(self, x, y)?;
        self.set_pixel(x, y, to_pixel(&px)?);
        Ok(())
    }

    /// Fills every pixel; returns `false` unless `color` has four channels.
    #[wasm_bindgen(js_name = fill)]
    pub fn js_fill(&mut self, color: Vec<u16>) -> bool {
        self.fill(&color).is_some()
    }

    #[wasm_bindgen(js_name = pixelCallback)]
    pub fn js_pixel_callback(&mut self, f: &Function) -> JsResult<()> {
        apply_pixel_callback(self, f, JsValue::from, clamp_u16)
    }

    #[wasm_bindgen(js_name = getImageData)]
    pub fn js_get_image_data(&self) -> JsResult<JsValue> {
        Ok(image_data_to_js(&self.get_image_data())?)
    }

    #[wasm_bindgen(js_name = setImageData)]
    pub fn js_set_image_data(&mut self, image_data: &JsValue) -> JsResult<()> {
        Ok(self.set_image_data(image_data_from_js(image_data, Self::NATIVE_ARRAY)?)?)
    }

    #[wasm_bindgen(js_name = fromImageData)]
    pub fn js_from_image_data(image_data: &JsValue) -> JsResult<IntegerImage> {
        Ok(IntegerImage::from_image_data(image_data_from_js(
            image_data,
            Self::NATIVE_ARRAY,
        )?)?)
    }

    /// Resolves to a new image, or `undefined` if the image could not be rasterized.
    #[wasm_bindgen(js_name = fromURL)]
    pub async fn js_from_url(url: String) -> JsResult<JsValue> {
        let image: Option<IntegerImage> = loader::from_url(&url).await?;
        Ok(image.map_or(JsValue::UNDEFINED, JsValue::from))
    }

    #[wasm_bindgen(js_name = loadSDRImageData)]
    pub async fn js_load_sdr_image_data(url: String) -> JsResult<JsValue> {
        load_sdr_image_data_js(&url).await
    }

    #[wasm_bindgen(js_name = clone)]
    pub fn js_clone(&self) -> IntegerImage {
        self.clone()
    }

    #[wasm_bindgen(js_name = scaleUint8ToUint16)]
    pub fn js_scale_u8_to_u16(value: u8) -> u16 {
        scale_u8_to_u16(value)
    }

    #[wasm_bindgen(js_name = convertPixelToRec2100_hlg)]
    pub fn js_convert_pixel(pixel: Vec<u8>) -> JsResult<Vec<u16>> {
        Ok(convert_pixel_to_rec2100_hlg(to_pixel(&pixel)?).to_vec())
    }

    #[wasm_bindgen(js_name = convertArrayToRec2100_hlg)]
    pub fn js_convert_array(data: &[u8]) -> Vec<u16> {
        convert_array_to_rec2100_hlg(data)
    }
}

fn f16_to_js(v: f16) -> JsValue {
    JsValue::from(v.to_f32())
}

fn to_f16_pixel(px: &[f32]) -> JsResult<[f16; 4]> {
    let px: Vec<f16> = px.iter().copied().map(f16::from_f32).collect();
    to_pixel(&px)
}

#[wasm_bindgen(js_class = Float16Image)]
impl FloatImage {
    #[wasm_bindgen(constructor)]
    pub fn js_new(
        width: u32,
        height: u32,
        color_space: Option<String>,
        pixel_format: Option<String>,
    ) -> JsResult<FloatImage> {
        let (color_space, pixel_format) = parse_options::<Self>(color_space, pixel_format)?;
        Ok(FloatImage::new(width, height, color_space, pixel_format))
    }

    #[wasm_bindgen(getter = width)]
    pub fn js_width(&self) -> u32 {
        self.width()
    }

    #[wasm_bindgen(getter = height)]
    pub fn js_height(&self) -> u32 {
        self.height()
    }

    #[wasm_bindgen(getter = colorSpace)]
    pub fn js_color_space(&self) -> String {
        self.color_space().to_string()
    }

    #[wasm_bindgen(getter = pixelFormat)]
    pub fn js_pixel_format(&self) -> String {
        self.pixel_format().to_string()
    }

    /// A `Float16Array` copy of the channel buffer.
    #[wasm_bindgen(getter = data)]
    pub fn js_data(&self) -> JsResult<JsValue> {
        Ok(float16_array(self.data())?)
    }

    #[wasm_bindgen(js_name = getPixel)]
    pub fn js_get_pixel(&self, x: u32, y: u32) -> JsResult<Vec<f32>> {
        check_bounds(self, x, y)?;
        Ok(self.get_pixel(x, y).iter().map(|v| v.to_f32()).collect())
    }

    #[wasm_bindgen(js_name = setPixel)]
    pub fn js_set_pixel(&mut self, x: u32, y: u32, px: Vec<f32>) -> JsResult<()> {
        check_bounds(self, x, y)?;
        self.set_pixel(x, y, to_f16_pixel(&px)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = fill)]
    pub fn js_fill(&mut self, color: Vec<f32>) -> bool {
        let color: Vec<f16> = color.into_iter().map(f16::from_f32).collect();
        self.fill(&color).is_some()
    }

    #[wasm_bindgen(js_name = pixelCallback)]
    pub fn js_pixel_callback(&mut self, f: &Function) -> JsResult<()> {
        apply_pixel_callback(self, f, f16_to_js, f16::from_f64)
    }

    #[wasm_bindgen(js_name = getImageData)]
    pub fn js_get_image_data(&self) -> JsResult<JsValue> {
        Ok(image_data_to_js(&self.get_image_data())?)
    }

    #[wasm_bindgen(js_name = setImageData)]
    pub fn js_set_image_data(&mut self, image_data: &JsValue) -> JsResult<()> {
        Ok(self.set_image_data(image_data_from_js(image_data, Self::NATIVE_ARRAY)?)?)
    }

    #[wasm_bindgen(js_name = fromImageData)]
    pub fn js_from_image_data(image_data: &JsValue) -> JsResult<FloatImage> {
        Ok(FloatImage::from_image_data(image_data_from_js(
            image_data,
            Self::NATIVE_ARRAY,
        )?)?)
    }

    #[wasm_bindgen(js_name = fromImageDataArray)]
    pub fn js_from_image_data_array(width: u32, height: u32, data: &[u8]) -> JsResult<FloatImage> {
        Ok(FloatImage::from_image_data_array(width, height, data)?)
    }

    #[wasm_bindgen(js_name = fromURL)]
    pub async fn js_from_url(url: String) -> JsResult<JsValue> {
        let image: Option<FloatImage> = loader::from_url(&url).await?;
        Ok(image.map_or(JsValue::UNDEFINED, JsValue::from))
    }

    #[wasm_bindgen(js_name = loadSDRImageData)]
    pub async fn js_load_sdr_image_data(url: String) -> JsResult<JsValue> {
        load_sdr_image_data_js(&url).await
    }

    #[wasm_bindgen(js_name = clone)]
    pub fn js_clone(&self) -> FloatImage {
        self.clone()
    }

    #[wasm_bindgen(js_name = scaleUint8ToFloat16)]
    pub fn js_scale_u8(value: u8) -> u16 {
        scale_u8_to_u16(value)
    }

    #[wasm_bindgen(js_name = convertArrayToRec2100_hlg)]
    pub fn js_convert_array(data: &[u8]) -> JsResult<JsValue> {
        Ok(float16_array(&rescale_array_to_f16(data))?)
    }
}

async fn load_sdr_image_data_js(url: &str) -> JsResult<JsValue> {
    match loader::load_sdr_image_data(url).await? {
        Some(image_data) => Ok(image_data_to_js(&image_data)?),
        None => Ok(JsValue::UNDEFINED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixel() {
        assert_eq!(to_pixel(&[1u16, 2, 3, 4]).ok(), Some([1, 2, 3, 4]));
    }

    #[test]
    fn test_clamp_u16() {
        assert_eq!(clamp_u16(-3.0), 0);
        assert_eq!(clamp_u16(70000.0), u16::MAX);
        assert_eq!(clamp_u16(1.6), 2);
    }

    #[test]
    fn test_parse_options() {
        let (space, format) = parse_options::<FloatImage>(
            Some("srgb".to_string()),
            Some("rgba-float16".to_string()),
        )
        .unwrap();
        assert_eq!(space, Some(HdrColorSpace::Srgb));
        assert_eq!(format, Some(ImageDataPixelFormat::RgbaFloat16));
        assert_eq!(parse_options::<IntegerImage>(None, None).unwrap(), (None, None));
    }

    #[test]
    fn test_unknown_pixel_format_uses_variant_default() {
        for name in ["float32", "bogus"] {
            let (_, format) =
                parse_options::<IntegerImage>(None, Some(name.to_string())).unwrap();
            assert_eq!(format, Some(ImageDataPixelFormat::RgbaUnorm8));
            let image = IntegerImage::new(1, 1, None, format);
            assert_eq!(image.pixel_format(), ImageDataPixelFormat::RgbaUnorm8);

            let (_, format) = parse_options::<FloatImage>(None, Some(name.to_string())).unwrap();
            assert_eq!(format, Some(ImageDataPixelFormat::RgbaFloat16));
            let image = FloatImage::new(1, 1, None, format);
            assert_eq!(image.pixel_format(), ImageDataPixelFormat::RgbaFloat16);
        }
        assert_eq!(
            pixel_format_or_default::<FloatImage>(Some("rgba-unorm8".to_string())),
            Some(ImageDataPixelFormat::RgbaUnorm8)
        );
    }
}
