#![cfg(target_arch = "wasm32")]

use futures_util::future::{select, Either};
use gloo_timers::future::TimeoutFuture;
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlScriptElement, Window};
use widget_core::js::error_text as js_error_text;
use widget_core::{EnvironmentContext, LoaderConfig, WidgetConfig, WidgetError, WidgetType};

const RENDER_FN: &str = "renderWidget";
const API_BASE_KEY: &str = "apiBaseUrl";

/// The bundle's global namespace and its `renderWidget` function.
pub struct Renderer {
    namespace: JsValue,
    render: Function,
}

impl Renderer {
    fn lookup(window: &Window, config: &LoaderConfig) -> Option<Self> {
        let namespace =
            Reflect::get(window, &JsValue::from_str(&config.renderer_namespace)).ok()?;
        if !namespace.is_object() {
            return None;
        }
        let render = Reflect::get(&namespace, &JsValue::from_str(RENDER_FN))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        Some(Self { namespace, render })
    }

    /// Makes the resolved API origin visible to the bundle's fetch redirector.
    pub fn publish_api_base(&self, api_base_url: &str) -> Result<(), JsValue> {
        Reflect::set(
            &self.namespace,
            &JsValue::from_str(API_BASE_KEY),
            &JsValue::from_str(api_base_url),
        )?;
        Ok(())
    }

    pub fn render(
        &self,
        container: &Element,
        widget_type: WidgetType,
        config: &WidgetConfig,
    ) -> Result<(), WidgetError> {
        let config = config
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| WidgetError::Render(err.to_string()))?;
        self.render
            .call3(
                &self.namespace,
                container,
                &JsValue::from_str(widget_type.as_str()),
                &config,
            )
            .map_err(|err| WidgetError::Render(js_error_text(&err)))?;
        Ok(())
    }
}

/// Appends the bundle `<script>` and waits for its renderer to show up.
///
/// Already-present renderers are reused. After the script's `load` event the
/// namespace gets one more check after `renderer_grace_ms`, since the bundle
/// may still be instantiating its wasm.
pub async fn load(
    window: &Window,
    document: &Document,
    env: &EnvironmentContext,
    config: &LoaderConfig,
) -> Result<Renderer, WidgetError> {
    if let Some(renderer) = Renderer::lookup(window, config) {
        return Ok(renderer);
    }

    let url = env.bundle_url(config);
    let script: HtmlScriptElement = document
        .create_element("script")
        .map_err(|err| WidgetError::Dom(js_error_text(&err)))?
        .dyn_into()
        .map_err(|_| WidgetError::Dom("phần tử tạo ra không phải <script>".to_string()))?;
    script.set_src(&url);
    script.set_async(true);

    let settled = Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
    });

    let body = document
        .body()
        .ok_or_else(|| WidgetError::Dom("Document không có thẻ <body>".to_string()))?;
    body.append_child(&script)
        .map_err(|err| WidgetError::Dom(js_error_text(&err)))?;

    let loaded = Box::pin(JsFuture::from(settled));
    let timeout = Box::pin(TimeoutFuture::new(config.bundle_load_timeout_ms));
    match select(loaded, timeout).await {
        Either::Left((Ok(_), _)) => {}
        Either::Left((Err(_), _)) => {
            return Err(WidgetError::BundleLoad(format!("could not load {url}")));
        }
        Either::Right(_) => {
            return Err(WidgetError::BundleLoad(format!(
                "{url} did not load within {} ms",
                config.bundle_load_timeout_ms
            )));
        }
    }

    if let Some(renderer) = Renderer::lookup(window, config) {
        return Ok(renderer);
    }
    TimeoutFuture::new(config.renderer_grace_ms).await;
    Renderer::lookup(window, config).ok_or_else(|| {
        WidgetError::RendererUnavailable(format!(
            "window.{}.{RENDER_FN} is missing after loading {url}",
            config.renderer_namespace
        ))
    })
}
