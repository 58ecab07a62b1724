#![cfg(target_arch = "wasm32")]

//! Network Redirector: wraps `window.fetch` once per page so relative `/api/...`
//! calls made by the widgets reach the data API origin the loader resolved.

use js_sys::{Date, Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{console, Request, Response, Window};
use widget_core::diag;
use widget_core::redirect::{describe_fetch, rewrite_api_url, settle};

/// Window property flagging an installed redirector.
const INSTALLED_FLAG: &str = "__epFetchRedirect";
const API_BASE_KEY: &str = "apiBaseUrl";

pub fn is_installed(window: &Window) -> bool {
    Reflect::get(window, &JsValue::from_str(INSTALLED_FLAG))
        .map(|flag| flag.is_truthy())
        .unwrap_or(false)
}

/// Wraps `fetch`. The API origin is read from `window[namespace].apiBaseUrl`
/// at call time. Returns `false` if a redirector was already installed.
pub fn install(window: &Window, namespace: &str) -> Result<bool, JsValue> {
    if is_installed(window) {
        return Ok(false);
    }
    let key = JsValue::from_str("fetch");
    let original: Function = Reflect::get(window, &key)?.dyn_into()?;
    let global = window.clone();
    let namespace = namespace.to_string();

    let wrapper = Closure::<dyn Fn(JsValue, JsValue) -> Promise>::new(
        move |input: JsValue, init: JsValue| {
            let (input, url) = match input.as_string() {
                Some(url) => {
                    let url = match current_api_base(&global, &namespace) {
                        Some(base) => rewrite_api_url(&url, &base).into_owned(),
                        None => url,
                    };
                    (JsValue::from_str(&url), url)
                }
                None => {
                    let url = describe_input(&input);
                    (input, url)
                }
            };

            let started = Date::now();
            let pending = match original.call2(&global, &input, &init) {
                Ok(value) => Promise::resolve(&value),
                Err(err) => Promise::reject(&err),
            };

            future_to_promise(async move {
                let (outcome, result) = settle(JsFuture::from(pending).await, |value| {
                    value.dyn_ref::<Response>().map(Response::status)
                });
                let line = diag::tagged(&describe_fetch(&url, outcome, Date::now() - started));
                console::log_1(&JsValue::from_str(&line));
                // The caller sees the original resolution or rejection value.
                result
            })
        },
    );

    Reflect::set(window, &key, wrapper.as_ref())?;
    Reflect::set(window, &JsValue::from_str(INSTALLED_FLAG), &JsValue::TRUE)?;
    wrapper.forget();
    Ok(true)
}

fn current_api_base(window: &Window, namespace: &str) -> Option<String> {
    let namespace = Reflect::get(window, &JsValue::from_str(namespace)).ok()?;
    if !namespace.is_object() {
        return None;
    }
    Reflect::get(&namespace, &JsValue::from_str(API_BASE_KEY))
        .ok()?
        .as_string()
        .filter(|base| !base.trim().is_empty())
}

fn describe_input(input: &JsValue) -> String {
    input
        .dyn_ref::<Request>()
        .map(Request::url)
        .unwrap_or_else(|| format!("{input:?}"))
}
