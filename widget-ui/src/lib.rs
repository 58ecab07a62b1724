//! Bundle giao diện widget: điểm vào `renderWidget`, trang `/embed/*` và các
//! phần chạy trong trình duyệt của kênh resize và bộ chuyển hướng fetch.

#[cfg(target_arch = "wasm32")]
mod fetch_redirect;
#[cfg(target_arch = "wasm32")]
mod height;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use crate::{fetch_redirect, height, styles};
    use js_sys::{Object, Reflect};
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::{spawn_local, JsFuture};
    use web_sys::{console, Document, Element, HtmlIFrameElement, Response, Window};
    use widget_core::embed::{parse_query, widget_type_from_path, EmbedConfig, EmbedRequest};
    use widget_core::js::error_text as js_error_text;
    use widget_core::table::Table;
    use widget_core::{
        validate_config, ColorScheme, WidgetConfig, WidgetError, WidgetType, RENDERER_NAMESPACE,
    };
    use yew::prelude::*;

    enum FetchState {
        Loading,
        Loaded(Table),
        Failed(String),
    }

    #[derive(Properties, PartialEq)]
    pub struct WidgetViewProps {
        pub widget_type: WidgetType,
        pub config: WidgetConfig,
        /// Report content height to the parent window (iframe delivery).
        pub report_height: bool,
    }

    #[function_component(WidgetView)]
    fn widget_view(props: &WidgetViewProps) -> Html {
        let root = use_node_ref();
        height::use_height_reporter(root.clone(), props.report_height);

        let state = use_state(|| FetchState::Loading);
        {
            let state = state.clone();
            use_effect_with(
                (props.widget_type, props.config.clone()),
                move |(widget_type, config)| {
                    let path = config.api_path(*widget_type);
                    let limit = row_limit(config);
                    spawn_local(async move {
                        let next = match fetch_json(&path).await {
                            Ok(value) => {
                                let mut table = Table::from_json(&value);
                                if let Some(limit) = limit {
                                    table.truncate(limit);
                                }
                                FetchState::Loaded(table)
                            }
                            Err(err) => FetchState::Failed(js_error_text(&err)),
                        };
                        state.set(next);
                    });
                    || ()
                },
            );
        }

        let scheme = ColorScheme::from_config(&props.config);

        html! {
            <div
                ref={root}
                class="ep-widget-root"
                style={styles::scheme_style(&scheme)}
                data-widget-type={props.widget_type.as_str()}
            >
                <header class="ep-widget-header">
                    <h2>{ props.widget_type.title() }</h2>
                </header>
                <section class="ep-widget-body">
                    { render_state(&state) }
                </section>
                <footer class="ep-widget-footer">
                    <a href="https://www.eliteprospects.com" target="_blank" rel="noopener">{"Elite Prospects"}</a>
                </footer>
            </div>
        }
    }

    fn render_state(state: &FetchState) -> Html {
        match state {
            FetchState::Loading => html! {
                <p class="ep-widget-status" data-state="loading">{"Loading…"}</p>
            },
            FetchState::Failed(message) => html! {
                <p class="ep-widget-status" data-state="error">{ format!("Could not load data: {message}") }</p>
            },
            FetchState::Loaded(table) if table.is_empty() => html! {
                <p class="ep-widget-status" data-state="empty">{"No data available."}</p>
            },
            FetchState::Loaded(table) => render_table(table),
        }
    }

    fn render_table(table: &Table) -> Html {
        html! {
            <div class="ep-widget-table-wrap">
                <table class="ep-widget-table">
                    <thead>
                        <tr>
                            { for table.columns.iter().map(|column| html! { <th>{ column.clone() }</th> }) }
                        </tr>
                    </thead>
                    <tbody>
                        { for table.rows.iter().map(|row| render_row(row)) }
                    </tbody>
                </table>
            </div>
        }
    }

    fn render_row(row: &[String]) -> Html {
        html! {
            <tr>{ for row.iter().map(|cell| html! { <td>{ cell.clone() }</td> }) }</tr>
        }
    }

    fn row_limit(config: &WidgetConfig) -> Option<usize> {
        config
            .get("gameLimit")
            .or_else(|| config.get("limit"))
            .and_then(|value| value.trim().parse().ok())
    }

    async fn fetch_json(path: &str) -> Result<serde_json::Value, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        // Goes through the redirector installed in `start`.
        let response: Response = JsFuture::from(window.fetch_with_str(path))
            .await?
            .dyn_into()?;
        if !response.ok() {
            return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
        }
        let body = JsFuture::from(response.json()?).await?;
        from_value(body).map_err(|err| JsValue::from_str(&format!("Không đọc được JSON: {err}")))
    }

    fn to_js(err: WidgetError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    fn window_and_document() -> Result<(Window, Document), JsValue> {
        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;
        Ok((window, document))
    }

    fn mount(
        target: Element,
        widget_type: WidgetType,
        config: WidgetConfig,
        report_height: bool,
    ) -> Result<(), JsValue> {
        let (_, document) = window_and_document()?;
        styles::ensure_styles(&document)?;

        yew::Renderer::<WidgetView>::with_root_and_props(
            target,
            WidgetViewProps {
                widget_type,
                config,
                report_height,
            },
        )
        .render();
        Ok(())
    }

    /// Renderer entry point for direct-script delivery.
    #[wasm_bindgen(js_name = renderWidget)]
    pub fn render_widget(
        container: Element,
        widget_type: &str,
        config: JsValue,
    ) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let widget_type: WidgetType = widget_type.parse().map_err(to_js)?;
        let config: WidgetConfig = from_value(config)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
        validate_config(widget_type, &config).map_err(to_js)?;

        mount(container, widget_type, config, false)
    }

    /// Mounts the widget of an `/embed/<type>?<params>` page into `selector`
    /// and reports its height to the embedding page.
    #[wasm_bindgen(js_name = mountEmbedPage)]
    pub fn mount_embed_page(selector: &str) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let (window, document) = window_and_document()?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))?;

        let location = window.location();
        let widget_type =
            widget_type_from_path(&location.pathname()?, &EmbedConfig::default()).map_err(to_js)?;
        let request = EmbedRequest::new(widget_type, parse_query(&location.search()?)).map_err(to_js)?;
        let config = WidgetConfig::new("embed-0", &location.origin()?, request.params);

        mount(target, widget_type, config, true)
    }

    /// Publishes `window.EPWidgets` and installs the fetch redirector.
    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let (window, _) = window_and_document()?;

        let namespace = match Reflect::get(&window, &JsValue::from_str(RENDERER_NAMESPACE)) {
            Ok(existing) if existing.is_object() => existing,
            _ => {
                let created: JsValue = Object::new().into();
                Reflect::set(&window, &JsValue::from_str(RENDERER_NAMESPACE), &created)?;
                created
            }
        };

        let render = Closure::<dyn Fn(Element, String, JsValue) -> Result<(), JsValue>>::new(
            |container: Element, widget_type: String, config: JsValue| {
                render_widget(container, &widget_type, config)
            },
        );
        let embed = Closure::<dyn Fn(String) -> Result<(), JsValue>>::new(|selector: String| {
            mount_embed_page(&selector)
        });
        let resizer = Closure::<dyn Fn(HtmlIFrameElement) -> Result<(), JsValue>>::new(
            height::attach_iframe_resizer,
        );
        Reflect::set(&namespace, &JsValue::from_str("renderWidget"), render.as_ref())?;
        Reflect::set(&namespace, &JsValue::from_str("mountEmbedPage"), embed.as_ref())?;
        Reflect::set(&namespace, &JsValue::from_str("attachIframeResizer"), resizer.as_ref())?;
        render.forget();
        embed.forget();
        resizer.forget();

        // Same-origin default; the loader overwrites it on host pages.
        let api_key = JsValue::from_str("apiBaseUrl");
        if Reflect::get(&namespace, &api_key)?.as_string().is_none() {
            Reflect::set(&namespace, &api_key, &JsValue::from_str(&window.location().origin()?))?;
        }

        if !fetch_redirect::install(&window, RENDERER_NAMESPACE)? {
            console::log_1(&JsValue::from_str(&widget_core::diag::tagged(
                "fetch redirector already installed",
            )));
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use height::attach_iframe_resizer;
#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{mount_embed_page, render_widget};

#[cfg(not(target_arch = "wasm32"))]
pub fn render_widget(
    _: wasm_bindgen::JsValue,
    _: &str,
    _: wasm_bindgen::JsValue,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "widget-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_embed_page(_: &str) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "widget-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
