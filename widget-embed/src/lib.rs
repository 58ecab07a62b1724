//! Script nhúng dạng iframe: mỗi thẻ `<script data-widget-type=...>` được thay
//! bằng một iframe `/embed/<type>` ngay sau nó, chiều cao theo thông điệp resize.

#[cfg(target_arch = "wasm32")]
mod wasm_embed {
    use js_sys::{Object, Reflect};
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{
        console, Document, Element, HtmlIFrameElement, HtmlScriptElement, MessageEvent, Window,
    };
    use widget_core::embed::{EmbedConfig, EmbedRequest};
    use widget_core::attributes::EMBEDDED_ATTRIBUTE;
    use widget_core::js::error_text;
    use widget_core::{diag, HeightListener};

    const CONFIG_GLOBAL: &str = "EPWidgetEmbedConfig";
    const SCRIPT_SELECTOR: &str = "script[data-widget-type]:not([data-ep-embedded])";

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        embed_widgets().map(|_| ())
    }

    /// Replaces every unprocessed embed script with its iframe and returns how
    /// many iframes were inserted.
    #[wasm_bindgen(js_name = embedWidgets)]
    pub fn embed_widgets() -> Result<u32, JsValue> {
        let window: Window = web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;
        let config = read_config(&window);

        let scripts = document.query_selector_all(SCRIPT_SELECTOR)?;
        let mut inserted = 0;
        for script in (0..scripts.length())
            .filter_map(|idx| scripts.item(idx))
            .filter_map(|node| node.dyn_into::<HtmlScriptElement>().ok())
        {
            let attributes = attributes_of(&script);
            script.set_attribute(EMBEDDED_ATTRIBUTE, "true")?;
            match embed_one(&window, &document, &script, &attributes, &config) {
                Ok(()) => inserted += 1,
                // Nothing is inserted for a rejected tag.
                Err(err) => console::error_1(&JsValue::from_str(&diag::tagged(&err))),
            }
        }
        Ok(inserted)
    }

    fn embed_one(
        window: &Window,
        document: &Document,
        script: &HtmlScriptElement,
        attributes: &[(String, String)],
        config: &EmbedConfig,
    ) -> Result<(), String> {
        let request = EmbedRequest::from_attributes(
            attributes
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )
        .map_err(|err| err.to_string())?;
        let config = config.clone().for_script(&script.src());

        let iframe =
            create_iframe(document, &request, &config).map_err(|err| error_text(&err))?;
        let parent = script
            .parent_node()
            .ok_or_else(|| "embed script has no parent".to_string())?;
        parent
            .insert_before(&iframe, script.next_sibling().as_ref())
            .map_err(|err| error_text(&err))?;

        listen_for_height(window, iframe, HeightListener::pinned(&config.base_url))
            .map_err(|err| error_text(&err))
    }

    fn create_iframe(
        document: &Document,
        request: &EmbedRequest,
        config: &EmbedConfig,
    ) -> Result<HtmlIFrameElement, JsValue> {
        let iframe: HtmlIFrameElement = document.create_element("iframe")?.dyn_into()?;
        iframe.set_src(&request.iframe_src(config));
        iframe.set_title(&request.iframe_title());
        iframe.set_width("100%");
        iframe.set_attribute("scrolling", "no")?;
        iframe.set_attribute("loading", "lazy")?;

        let style = iframe.style();
        style.set_property("border", "none")?;
        style.set_property("width", "100%")?;
        style.set_property("height", &format!("{}px", config.default_height_px))?;
        Ok(iframe)
    }

    /// Applies resize messages from `iframe` only: the origin must match and
    /// the sender must be the iframe's own window.
    fn listen_for_height(
        window: &Window,
        iframe: HtmlIFrameElement,
        listener: HeightListener,
    ) -> Result<(), JsValue> {
        let callback = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let from_iframe = match (event.source(), iframe.content_window()) {
                (Some(source), Some(frame)) => Object::is(&source, &frame),
                _ => false,
            };
            if !from_iframe {
                return;
            }
            let data = event.data().as_string();
            if let Some(message) = listener.accept(&event.origin(), data.as_deref()) {
                let _ = iframe.style().set_property("height", &message.css_height());
            }
        });
        window.add_event_listener_with_callback("message", callback.as_ref().unchecked_ref())?;
        callback.forget();
        Ok(())
    }

    fn attributes_of(element: &Element) -> Vec<(String, String)> {
        element
            .get_attribute_names()
            .iter()
            .filter_map(|name| name.as_string())
            .filter_map(|name| {
                let value = element.get_attribute(&name)?;
                Some((name, value))
            })
            .collect()
    }

    fn read_config(window: &Window) -> EmbedConfig {
        let raw = Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL)).unwrap_or(JsValue::UNDEFINED);
        if raw.is_undefined() || raw.is_null() {
            return EmbedConfig::default();
        }
        from_value(raw).unwrap_or_else(|err| {
            console::warn_1(&JsValue::from_str(&diag::tagged(&format!(
                "bỏ qua {CONFIG_GLOBAL} không hợp lệ: {err}"
            ))));
            EmbedConfig::default()
        })
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_embed::embed_widgets;

#[cfg(not(target_arch = "wasm32"))]
pub fn embed_widgets() -> Result<u32, wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "widget-embed chỉ hỗ trợ biên dịch target wasm32",
    ))
}
