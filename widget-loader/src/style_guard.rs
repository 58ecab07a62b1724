#![cfg(target_arch = "wasm32")]

//! DOM half of the Style Isolation Guard. Intercepts `<style>` elements the
//! bundle creates and rewrites their text with
//! [`widget_core::style_guard::rewrite_stylesheet`].

use std::borrow::Cow;
use std::cell::Cell;

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, MutationObserver, MutationObserverInit, MutationRecord, Node, Text,
};
use widget_core::style_guard::{
    guard_active, rewrite_stylesheet, GUARD_MARKER_ATTRIBUTE, GUARD_MARKER_VALUE,
};

thread_local! {
    static INSTALLED: Cell<bool> = const { Cell::new(false) };
}

/// Whether this page already runs a guard, from this module or another copy
/// of the loader.
pub fn is_installed(document: &Document) -> bool {
    let marker = document
        .document_element()
        .and_then(|root| root.get_attribute(GUARD_MARKER_ATTRIBUTE));
    guard_active(INSTALLED.with(Cell::get), marker.as_deref())
}

/// Patches `document.createElement` and starts watching for `<style>` nodes.
/// Returns `false` when a guard was already in place.
pub fn install(document: &Document) -> Result<bool, JsValue> {
    if is_installed(document) {
        return Ok(false);
    }
    let root = document
        .document_element()
        .ok_or_else(|| JsValue::from_str("Document không có phần tử gốc"))?;

    patch_create_element(document)?;
    observe_style_nodes(&root)?;

    root.set_attribute(GUARD_MARKER_ATTRIBUTE, GUARD_MARKER_VALUE)?;
    INSTALLED.with(|flag| flag.set(true));
    Ok(true)
}

fn patch_create_element(document: &Document) -> Result<(), JsValue> {
    let key = JsValue::from_str("createElement");
    let original: Function = Reflect::get(document, &key)?.dyn_into()?;
    let target: JsValue = document.clone().into();

    let wrapper = Closure::<dyn Fn(JsValue, JsValue) -> Result<JsValue, JsValue>>::new(
        move |tag: JsValue, options: JsValue| {
            let element = original.call2(&target, &tag, &options)?;
            let is_style = tag
                .as_string()
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("style"));
            if is_style {
                patch_append_child(&element);
            }
            Ok(element)
        },
    );
    Reflect::set(document, &key, wrapper.as_ref())?;
    // Lives as long as the page.
    wrapper.forget();
    Ok(())
}

/// Rewrites text nodes on their way into a freshly created `<style>`.
fn patch_append_child(style: &JsValue) {
    let key = JsValue::from_str("appendChild");
    let Ok(original) = Reflect::get(style, &key).and_then(|f| f.dyn_into::<Function>()) else {
        return;
    };
    let target = style.clone();

    let wrapper = Closure::<dyn Fn(JsValue) -> Result<JsValue, JsValue>>::new(
        move |child: JsValue| {
            if let Some(text) = child.dyn_ref::<Text>() {
                if let Cow::Owned(guarded) = rewrite_stylesheet(&text.data()) {
                    text.set_data(&guarded);
                }
            }
            original.call1(&target, &child)
        },
    );
    if Reflect::set(style, &key, wrapper.as_ref()).is_ok() {
        wrapper.forget();
    }
}

/// Catches styles injected by any other path (`textContent`, `innerHTML`,
/// parser-inserted). Rewrites happen in place.
fn observe_style_nodes(root: &Element) -> Result<(), JsValue> {
    let callback = Closure::<dyn Fn(Array, MutationObserver)>::new(
        |records: Array, _observer: MutationObserver| {
            for record in records.iter() {
                let Ok(record) = record.dyn_into::<MutationRecord>() else {
                    continue;
                };
                if let Some(target) = record.target() {
                    guard_style_node(&target);
                }
                let added = record.added_nodes();
                for idx in 0..added.length() {
                    if let Some(node) = added.item(idx) {
                        guard_style_node(&node);
                    }
                }
            }
        },
    );

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    init.set_character_data(true);
    observer.observe_with_options(root, &init)?;
    callback.forget();
    Ok(())
}

fn guard_style_node(node: &Node) {
    let style = if is_style(node) {
        node.clone()
    } else {
        match node.parent_node() {
            Some(parent) if is_style(&parent) => parent,
            _ => return,
        }
    };

    let css = style.text_content().unwrap_or_default();
    if let Cow::Owned(guarded) = rewrite_stylesheet(&css) {
        // Triggers one more mutation, which finds nothing left to rewrite.
        style.set_text_content(Some(&guarded));
    }
}

fn is_style(node: &Node) -> bool {
    node.node_type() == Node::ELEMENT_NODE && node.node_name().eq_ignore_ascii_case("style")
}
