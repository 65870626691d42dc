//! Conversions between Rust values and JavaScript objects.
//!
//! Every function here calls into JavaScript and must only run on wasm32.

use half::f16;
use js_sys::{Array, Float32Array, Function, Reflect, Uint16Array, Uint8Array, Uint8ClampedArray};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

use crate::color::HdrColorSpace;
use crate::error::{HdrCanvasError, Result};
use crate::types::{HdrImageData, ImageDataArray, ImageDataArrayKind, ImageDataPixelFormat};

/// Serializes `value` to a plain JavaScript object via JSON.
pub fn to_js_object<T: Serialize>(value: &T) -> Result<JsValue> {
    let json = serde_json::to_string(value)?;
    Ok(js_sys::JSON::parse(&json)?)
}

/// Reads a property from a JavaScript object.
pub fn get_property(target: &JsValue, key: &str) -> Result<JsValue> {
    Ok(Reflect::get(target, &JsValue::from_str(key))?)
}

/// Calls `new globalThis[name](...args)`.
pub fn construct_global(name: &str, args: &Array) -> Result<JsValue> {
    let ctor = get_property(&js_sys::global(), name)?;
    if ctor.is_undefined() {
        return Err(HdrCanvasError::Js(format!("{} is not available", name)));
    }
    let ctor: Function = ctor
        .dyn_into()
        .map_err(|_| HdrCanvasError::Js(format!("{} is not a constructor", name)))?;
    Ok(Reflect::construct(&ctor, args)?)
}

/// Builds a `Float16Array` holding `values`.
pub fn float16_array(values: &[f16]) -> Result<JsValue> {
    let widened: Vec<f32> = values.iter().map(|v| v.to_f32()).collect();
    construct_global("Float16Array", &Array::of1(&Float32Array::from(&widened[..])))
}

fn constructor_name(value: &JsValue) -> Option<String> {
    let ctor = Reflect::get(value, &JsValue::from_str("constructor")).ok()?;
    Reflect::get(&ctor, &JsValue::from_str("name")).ok()?.as_string()
}

/// Copies the channels of any array an `ImageData` may carry.
///
/// Typed arrays keep their own domain. A plain `Array` carries no domain and
/// is read as `plain`.
pub fn image_data_array_from_js(
    data: &JsValue,
    plain: ImageDataArrayKind,
) -> Result<ImageDataArray> {
    if let Some(array) = data.dyn_ref::<Uint8ClampedArray>() {
        return Ok(ImageDataArray::Uint8(array.to_vec()));
    }
    if let Some(array) = data.dyn_ref::<Uint8Array>() {
        return Ok(ImageDataArray::Uint8(array.to_vec()));
    }
    if let Some(array) = data.dyn_ref::<Uint16Array>() {
        return Ok(ImageDataArray::Uint16(array.to_vec()));
    }
    if let Some(array) = data.dyn_ref::<Array>() {
        let values: Vec<f64> = array.iter().map(|v| v.as_f64().unwrap_or(0.0)).collect();
        return Ok(ImageDataArray::from_numbers(plain, &values));
    }
    match constructor_name(data).as_deref() {
        Some("Float16Array") | Some("Float32Array") => {
            let values = Float32Array::new(data).to_vec();
            Ok(ImageDataArray::Float16(values.into_iter().map(f16::from_f32).collect()))
        }
        other => Err(HdrCanvasError::Js(format!(
            "unsupported image data array: {}",
            other.unwrap_or("unknown")
        ))),
    }
}

/// Reads an `ImageData`-shaped object (`colorSpace`, `width`, `height`, `data`).
///
/// A missing `colorSpace` means `srgb`, as for a plain canvas `ImageData`.
/// `native` is the array kind of the receiving image, used for plain arrays
/// outside `srgb`.
pub fn image_data_from_js(value: &JsValue, native: ImageDataArrayKind) -> Result<HdrImageData> {
    let color_space = match get_property(value, "colorSpace")?.as_string() {
        Some(name) => name.parse()?,
        None => HdrColorSpace::Srgb,
    };
    let pixel_format = ImageDataPixelFormat::parse_or(
        get_property(value, "pixelFormat")?.as_string().as_deref(),
        ImageDataPixelFormat::RgbaUnorm8,
    );
    let dimension = |key: &str| -> Result<u32> {
        get_property(value, key)?
            .as_f64()
            .map(|v| v as u32)
            .ok_or_else(|| HdrCanvasError::Js(format!("image data has no numeric {}", key)))
    };
    let plain = ImageDataArrayKind::for_plain_array(color_space, native);

    Ok(HdrImageData {
        color_space,
        pixel_format,
        width: dimension("width")?,
        height: dimension("height")?,
        data: image_data_array_from_js(&get_property(value, "data")?, plain)?,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageDataSettings {
    color_space: HdrColorSpace,
    #[serde(skip_serializing_if = "Option::is_none")]
    pixel_format: Option<ImageDataPixelFormat>,
}

impl ImageDataSettings {
    /// `ImageData` has no 16-bit integer format, so `Uint16Array` data goes
    /// without one.
    fn for_image_data(image_data: &HdrImageData) -> Self {
        let pixel_format = match image_data.data {
            ImageDataArray::Uint16(_) => None,
            _ => Some(image_data.pixel_format),
        };
        Self {
            color_space: image_data.color_space,
            pixel_format,
        }
    }
}

/// Builds a browser `ImageData` from an image-data value.
pub fn image_data_to_js(image_data: &HdrImageData) -> Result<JsValue> {
    let array: JsValue = match &image_data.data {
        ImageDataArray::Uint8(v) => Uint8ClampedArray::from(&v[..]).into(),
        ImageDataArray::Uint16(v) => Uint16Array::from(&v[..]).into(),
        ImageDataArray::Float16(v) => float16_array(v)?,
    };
    let settings = to_js_object(&ImageDataSettings::for_image_data(image_data))?;
    construct_global(
        "ImageData",
        &Array::of4(
            &array,
            &JsValue::from(image_data.width),
            &JsValue::from(image_data.height),
            &settings,
        ),
    )
}
