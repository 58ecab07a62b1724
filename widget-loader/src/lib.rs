//! Loader nhúng bằng một thẻ `<script>`: bảo vệ style của trang host, xác định môi
//! trường, tải bundle giao diện rồi gắn widget vào từng container `.ep-widget`.

#[cfg(target_arch = "wasm32")]
mod bundle;
#[cfg(target_arch = "wasm32")]
mod scan;
#[cfg(target_arch = "wasm32")]
mod style_guard;

#[cfg(target_arch = "wasm32")]
mod wasm_loader {
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{console, Document, ErrorEvent, Window};
    use widget_core::bootstrap::mount_all;
    use widget_core::{diag, EnvironmentContext, LoaderConfig};

    use crate::bundle::{self, Renderer};
    use crate::scan::{self, DomMount};
    use crate::style_guard;

    const CONFIG_GLOBAL: &str = "EPWidgetLoaderConfig";

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Some(window) = web_sys::window() {
            install_error_logger(&window);
        }
        init_widgets()
    }

    /// Quét lại trang và khởi tạo các container chưa sẵn sàng.
    #[wasm_bindgen(js_name = initWidgets)]
    pub fn init_widgets() -> Result<(), JsValue> {
        spawn_local(async {
            if let Err(err) = boot().await {
                console::error_1(&err);
            }
        });
        Ok(())
    }

    async fn boot() -> Result<(), JsValue> {
        let window: Window = web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let config = read_config(&window);

        // Must be active before the bundle's own code runs.
        if let Err(err) = style_guard::install(&document) {
            console::warn_1(&err);
        }

        let script_src = scan::loader_script_src(&document, &config);
        let env = EnvironmentContext::resolve(script_src.as_deref(), &config);
        console::log_1(&JsValue::from_str(&diag::environment_summary(&env)));

        scan::dom_ready(&document).await?;

        let renderer = match bundle::load(&window, &document, &env, &config).await {
            Ok(renderer) => renderer,
            Err(err) => {
                scan::report_bundle_failure(&document, &config, &err)?;
                return Ok(());
            }
        };
        renderer.publish_api_base(&env.api_base_url)?;
        mount_containers(&document, &env, &config, &renderer)
    }

    fn mount_containers(
        document: &Document,
        env: &EnvironmentContext,
        config: &LoaderConfig,
        renderer: &Renderer,
    ) -> Result<(), JsValue> {
        let elements = scan::pending_containers(document, config)?;
        let attributes = elements.iter().map(scan::attributes_of).collect();

        let first_ordinal = scan::claim_ordinals(elements.len());
        let mut mounter = DomMount::new(&elements, renderer);
        let outcomes = mount_all(attributes, first_ordinal, env, config, &mut mounter);
        scan::report_outcomes(&elements, &outcomes);
        Ok(())
    }

    fn read_config(window: &Window) -> LoaderConfig {
        let raw = js_sys::Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL))
            .unwrap_or(JsValue::UNDEFINED);
        if raw.is_undefined() || raw.is_null() {
            return LoaderConfig::default();
        }
        from_value(raw).unwrap_or_else(|err| {
            console::warn_1(&JsValue::from_str(&diag::tagged(&format!(
                "bỏ qua {CONFIG_GLOBAL} không hợp lệ: {err}"
            ))));
            LoaderConfig::default()
        })
    }

    /// Logs uncaught page errors without suppressing the browser's own report.
    fn install_error_logger(window: &Window) {
        let callback = Closure::<dyn FnMut(ErrorEvent)>::new(|event: ErrorEvent| {
            console::error_1(&JsValue::from_str(&diag::tagged(&format!(
                "uncaught error: {} ({}:{})",
                event.message(),
                event.filename(),
                event.lineno()
            ))));
        });
        if window
            .add_event_listener_with_callback("error", callback.as_ref().unchecked_ref())
            .is_ok()
        {
            callback.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_loader::init_widgets;

#[cfg(not(target_arch = "wasm32"))]
pub fn init_widgets() -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "widget-loader chỉ hỗ trợ biên dịch target wasm32",
    ))
}
