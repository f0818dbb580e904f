//! Method-channel style entry points.
//!
//! These mirror the native dispatcher: a method name plus an argument
//! object with camelCase keys. Unknown methods and malformed arguments
//! throw a JS `Error` whose `name` is `NotImplemented` or
//! `InvalidArguments`; a failed operation returns `undefined`.
//!
//! ```typescript
//! try {
//!   const out = handle_method_call('resize', bytes, { destWidth: 800, destHeight: 600, quality: 85 });
//! } catch (e) {
//!   if (e.name === 'NotImplemented') { ... }
//! }
//! ```

use image_utils_core::handler::{respond, MethodCall};
use image_utils_core::{ops, rotation_degrees, CallError, ImageCodec};
use wasm_bindgen::prelude::*;

fn parse(method: &str, bytes: Vec<u8>, args: JsValue) -> Result<MethodCall, JsValue> {
    MethodCall::parse(method, bytes, serde_wasm_bindgen::Deserializer::from(args))
        .map_err(call_error)
}

fn call_error(err: CallError) -> JsValue {
    let name = match err {
        CallError::NotImplemented(_) => "NotImplemented",
        CallError::InvalidArguments { .. } => "InvalidArguments",
    };
    log::warn!("Rejected call: {}", err);

    let error = js_sys::Error::new(&err.to_string());
    error.set_name(name);
    error.into()
}

/// Run one of `crop`, `rotate`, `resize` or `resizeToMax`.
///
/// Returns the JPEG bytes, or `undefined` if the operation failed.
#[wasm_bindgen]
pub fn handle_method_call(
    method: &str,
    bytes: Vec<u8>,
    args: JsValue,
) -> Result<Option<Vec<u8>>, JsValue> {
    let call = parse(method, bytes, args)?;
    Ok(respond(&ImageCodec::default(), &call).into_bytes())
}

/// Compute the transform a call would perform, from the image header alone.
///
/// The result is a plain object `{ source_rect, dest_size, rotate_by,
/// output_size }` in raw (pre-EXIF) pixel coordinates.
#[wasm_bindgen]
pub fn plan_operation(method: &str, bytes: Vec<u8>, args: JsValue) -> Result<JsValue, JsValue> {
    let call = parse(method, bytes, args)?;
    let plan = ops::plan(&call.bytes, &call.op).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&plan).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Clockwise EXIF rotation of an encoded image: 0, 90, 180 or 270.
#[wasm_bindgen]
pub fn read_rotation(bytes: &[u8]) -> u32 {
    rotation_degrees(bytes).degrees()
}


/// Tests that construct or inspect `JsValue`s, which only works on wasm32.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::ops::tests::sample_jpeg;
    use image_utils_core::TransformPlan;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn args(json: &str) -> JsValue {
        js_sys::JSON::parse(json).unwrap()
    }

    fn error_name(value: JsValue) -> String {
        let error: js_sys::Error = value.dyn_into().unwrap();
        String::from(error.name())
    }

    #[wasm_bindgen_test]
    fn test_handle_method_call_success() {
        let out = handle_method_call(
            "resizeToMax",
            sample_jpeg(40, 20),
            args(r#"{ "maxSize": 10, "quality": 90 }"#),
        )
        .unwrap();
        assert!(out.is_some());
    }

    #[wasm_bindgen_test]
    fn test_failed_operation_is_undefined() {
        let out = handle_method_call(
            "rotate",
            vec![0x00, 0x01],
            args(r#"{ "angle": 90, "quality": 90 }"#),
        )
        .unwrap();
        assert!(out.is_none());
    }

    #[wasm_bindgen_test]
    fn test_unknown_method_throws_not_implemented() {
        let err = handle_method_call("blur", sample_jpeg(8, 8), args("{}")).unwrap_err();
        assert_eq!(error_name(err), "NotImplemented");
    }

    #[wasm_bindgen_test]
    fn test_bad_arguments_throw_invalid_arguments() {
        let err = handle_method_call("crop", sample_jpeg(8, 8), args(r#"{ "x": 0 }"#)).unwrap_err();
        assert_eq!(error_name(err), "InvalidArguments");
    }

    #[wasm_bindgen_test]
    fn test_plan_operation() {
        let value = plan_operation(
            "crop",
            sample_jpeg(40, 20),
            args(r#"{ "x": 0, "y": 0, "width": 10, "height": 10, "quality": 90 }"#),
        )
        .unwrap();

        let plan: TransformPlan = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(plan.output_size.width, 10);
        assert_eq!(plan.rotate_by, 0);
    }
}
