#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use web_sys::Document;
use widget_core::ColorScheme;

const STYLE_TAG_SELECTOR: &str = "style[data-ep-widgets]";

/// Stylesheet injected once per document by the bundle.
///
/// The first rule is the shared preflight; on host pages the loader's style
/// guard strips its `html` target and font-family before it applies.
pub const WIDGET_STYLES: &str = r#"html,:host{line-height:1.5;-webkit-text-size-adjust:100%;tab-size:4;font-family:ui-sans-serif,system-ui,sans-serif,"Apple Color Emoji","Segoe UI Emoji";-webkit-tap-highlight-color:transparent}

.ep-widget-root {
  --ep-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --ep-radius: 10px;
  --ep-border: rgba(5, 45, 65, 0.14);
  --ep-muted: #52606d;
  font-family: var(--ep-font-family);
  font-size: 14px;
  background: var(--ep-bg);
  color: var(--ep-text);
  border-radius: var(--ep-radius);
  overflow: hidden;
  box-sizing: border-box;
  width: 100%;
}

.ep-widget-root *,
.ep-widget-root *::before,
.ep-widget-root *::after {
  box-sizing: border-box;
}

.ep-widget-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  gap: 12px;
  padding: 12px 16px;
  color: var(--ep-header-text);
}

.ep-widget-header h2 {
  margin: 0;
  font-size: 1rem;
  font-weight: 700;
  letter-spacing: 0.01em;
}

.ep-widget-body {
  background: var(--ep-table-bg);
  padding: 0;
}

.ep-widget-status {
  margin: 0;
  padding: 16px;
  color: var(--ep-muted);
  text-align: center;
}

.ep-widget-status[data-state="error"] {
  color: #b42318;
}

.ep-widget-table-wrap {
  overflow-x: auto;
}

.ep-widget-table {
  width: 100%;
  border-collapse: collapse;
  font-variant-numeric: tabular-nums;
}

.ep-widget-table th {
  text-align: left;
  font-size: 0.75rem;
  text-transform: uppercase;
  letter-spacing: 0.04em;
  padding: 8px 12px;
  color: var(--ep-muted);
  border-bottom: 1px solid var(--ep-border);
  white-space: nowrap;
}

.ep-widget-table td {
  padding: 8px 12px;
  color: var(--ep-text);
  border-bottom: 1px solid var(--ep-border);
  white-space: nowrap;
}

.ep-widget-table td:first-child {
  color: var(--ep-name-text);
  font-weight: 600;
}

.ep-widget-table tr:last-child td {
  border-bottom: none;
}

.ep-widget-footer {
  padding: 8px 16px;
  font-size: 0.7rem;
  text-align: right;
  color: var(--ep-header-text);
}

.ep-widget-footer a {
  color: inherit;
}

@media (max-width: 540px) {
  .ep-widget-header {
    flex-direction: column;
    align-items: flex-start;
  }

  .ep-widget-table th,
  .ep-widget-table td {
    padding: 6px 8px;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-ep-widgets", "v1")?;
    style_el.append_child(&document.create_text_node(WIDGET_STYLES))?;
    head.append_child(&style_el)?;

    Ok(())
}

/// Inline custom properties carrying the widget's color scheme.
pub fn scheme_style(scheme: &ColorScheme) -> String {
    format!(
        "--ep-bg:{};--ep-text:{};--ep-table-bg:{};--ep-header-text:{};--ep-name-text:{};",
        scheme.background_color,
        scheme.text_color,
        scheme.table_background_color,
        scheme.header_text_color,
        scheme.name_text_color
    )
}
