#![cfg(target_arch = "wasm32")]

//! Both halves of the Resize Channel as they run in the browser.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Element, HtmlIFrameElement, MessageEvent, ResizeObserver, Window};
use widget_core::{HeightListener, HeightReporter, ResizeMessage};
use yew::prelude::*;

/// Observer and state of one reporting instance; dropping it via
/// [`ReporterHandle::stop`] is the Disposed transition.
struct ReporterHandle {
    observer: ResizeObserver,
    state: Rc<RefCell<HeightReporter>>,
    _callback: Closure<dyn FnMut(Array, ResizeObserver)>,
}

impl ReporterHandle {
    fn stop(self) {
        self.observer.disconnect();
        self.state.borrow_mut().dispose();
    }
}

/// Posts the content height of `node` to the parent window while mounted.
/// Does nothing when `enabled` is false (direct-script delivery).
#[hook]
pub fn use_height_reporter(node: NodeRef, enabled: bool) {
    use_effect_with((node, enabled), |(node, enabled)| {
        let handle = if *enabled {
            start_reporting(node).unwrap_or_else(|err| {
                console::warn_1(&err);
                None
            })
        } else {
            None
        };
        move || {
            if let Some(handle) = handle {
                handle.stop();
            }
        }
    });
}

fn start_reporting(node: &NodeRef) -> Result<Option<ReporterHandle>, JsValue> {
    let Some(element) = node.cast::<Element>() else {
        return Ok(None);
    };
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
    let Some(parent) = window.parent()? else {
        return Ok(None);
    };

    let state = Rc::new(RefCell::new(HeightReporter::new()));
    let initial = state.borrow_mut().start(content_height(&element));
    post(&parent, initial);

    let callback = {
        let state = state.clone();
        let element = element.clone();
        let parent = parent.clone();
        Closure::<dyn FnMut(Array, ResizeObserver)>::new(
            move |_entries: Array, _observer: ResizeObserver| {
                let message = state.borrow_mut().observe(content_height(&element));
                post(&parent, message);
            },
        )
    };
    let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
    observer.observe(&element);

    Ok(Some(ReporterHandle {
        observer,
        state,
        _callback: callback,
    }))
}

fn content_height(element: &Element) -> u32 {
    element.scroll_height().max(0) as u32
}

fn post(parent: &Window, message: Option<ResizeMessage>) {
    let Some(message) = message else {
        return;
    };
    // Payload is only a height, so any parent origin may read it.
    if let Err(err) = parent.post_message(&JsValue::from_str(&message.to_json()), "*") {
        console::warn_1(&err);
    }
}

/// Receiving half for pages that host an `/embed/*` iframe themselves.
///
/// Messages are accepted from any origin, unlike the embed script's listener.
#[wasm_bindgen(js_name = attachIframeResizer)]
pub fn attach_iframe_resizer(iframe: HtmlIFrameElement) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
    let listener = HeightListener::any_origin();

    let callback = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        let data = event.data().as_string();
        if let Some(message) = listener.accept(&event.origin(), data.as_deref()) {
            let _ = iframe.style().set_property("height", &message.css_height());
        }
    });
    window.add_event_listener_with_callback("message", callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}
