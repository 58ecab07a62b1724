#![cfg(target_arch = "wasm32")]

//! Helpers shared by the wasm crates at the JavaScript boundary.

use wasm_bindgen::{JsCast, JsValue};

/// Message of a thrown `Error`, the string itself, or its debug form.
pub fn error_text(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
