#![cfg(target_arch = "wasm32")]

use std::cell::Cell;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Document, Element, HtmlScriptElement};
use widget_core::attributes::{
    WIDGET_ERROR_ATTRIBUTE as ERROR_ATTRIBUTE, WIDGET_ID_ATTRIBUTE as ID_ATTRIBUTE,
    WIDGET_READY_ATTRIBUTE as READY_ATTRIBUTE,
};
use widget_core::bootstrap::{inline_error_text, MountOutcome, WidgetMount};
use widget_core::{diag, LoaderConfig, WidgetConfig, WidgetContainerDescriptor, WidgetError};

use crate::bundle::Renderer;

thread_local! {
    static NEXT_ORDINAL: Cell<usize> = const { Cell::new(0) };
}

/// Reserves `count` ordinals for one scan and returns the first. Ordinals keep
/// counting across `initWidgets` calls so ids stay unique per page load.
pub fn claim_ordinals(count: usize) -> usize {
    NEXT_ORDINAL.with(|next| {
        let first = next.get();
        next.set(first + count);
        first
    })
}

/// Absolute URL of the loader's own script.
///
/// wasm runs after the tag finished executing, so `currentScript` is usually
/// gone; the last script whose URL mentions the loader wins, then the last
/// script on the page.
pub fn loader_script_src(document: &Document, config: &LoaderConfig) -> Option<String> {
    let script_url = |element: &Element| {
        element
            .dyn_ref::<HtmlScriptElement>()
            .map(HtmlScriptElement::src)
            .filter(|src| !src.is_empty())
    };

    if let Some(src) = document.current_script().as_ref().and_then(script_url) {
        return Some(src);
    }

    let scripts = document.get_elements_by_tag_name("script");
    let all: Vec<Element> = (0..scripts.length())
        .filter_map(|idx| scripts.item(idx))
        .collect();
    all.iter()
        .rev()
        .filter_map(script_url)
        .find(|src| src.contains(&config.loader_script_hint))
        .or_else(|| all.last().and_then(script_url))
}

/// Resolves once the document has been parsed.
pub async fn dom_ready(document: &Document) -> Result<(), JsValue> {
    if document.ready_state() != "loading" {
        return Ok(());
    }
    let ready = Promise::new(&mut |resolve, _reject| {
        let _ = document.add_event_listener_with_callback("DOMContentLoaded", &resolve);
    });
    JsFuture::from(ready).await?;
    Ok(())
}

/// Marker-class containers not yet mounted, in document order.
pub fn pending_containers(document: &Document, config: &LoaderConfig) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(&format!(".{}", config.marker_class))?;
    Ok((0..nodes.length())
        .filter_map(|idx| nodes.item(idx))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .filter(|element| !element.has_attribute(READY_ATTRIBUTE))
        .collect())
}

/// Attribute name/value pairs in DOM order.
pub fn attributes_of(element: &Element) -> Vec<(String, String)> {
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

/// Mounts through the bundle's `renderWidget`, one element per scanned index.
pub struct DomMount<'a> {
    elements: &'a [Element],
    renderer: &'a Renderer,
}

impl<'a> DomMount<'a> {
    pub fn new(elements: &'a [Element], renderer: &'a Renderer) -> Self {
        Self { elements, renderer }
    }
}

impl WidgetMount for DomMount<'_> {
    fn mount(
        &mut self,
        index: usize,
        descriptor: &WidgetContainerDescriptor,
        config: &WidgetConfig,
    ) -> Result<(), WidgetError> {
        let element = self
            .elements
            .get(index)
            .ok_or_else(|| WidgetError::Dom(format!("container #{index} biến mất")))?;
        element
            .set_attribute(ID_ATTRIBUTE, &descriptor.widget_id)
            .map_err(|_| WidgetError::Dom(format!("không ghi được {ID_ATTRIBUTE}")))?;
        self.renderer
            .render(element, descriptor.widget_type, config)?;
        let _ = element.set_attribute(READY_ATTRIBUTE, "true");
        Ok(())
    }
}

/// Writes each failure into its own container; mounted siblings are untouched.
pub fn report_outcomes(elements: &[Element], outcomes: &[MountOutcome]) {
    for outcome in outcomes {
        if let MountOutcome::Failed { index, error } = outcome {
            let widget_id = elements
                .get(*index)
                .and_then(|element| element.get_attribute(ID_ATTRIBUTE))
                .unwrap_or_else(|| format!("container #{index}"));
            console::error_1(&JsValue::from_str(&diag::widget_failure(&widget_id, error)));
            if let Some(element) = elements.get(*index) {
                show_error(element, error);
            }
        }
    }
}

/// Bundle-level failure: every container still waiting gets the message.
pub fn report_bundle_failure(
    document: &Document,
    config: &LoaderConfig,
    error: &WidgetError,
) -> Result<(), JsValue> {
    console::error_1(&JsValue::from_str(&diag::tagged(&error.to_string())));
    for element in pending_containers(document, config)? {
        show_error(&element, error);
    }
    Ok(())
}

fn show_error(element: &Element, error: &WidgetError) {
    element.set_text_content(Some(&inline_error_text(error)));
    let _ = element.set_attribute(ERROR_ATTRIBUTE, "true");
}
