//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! The Chart.js wrapper lives in `assets/js/line-chart.js` and is loaded at
//! runtime once the `Chart` global exists. Its functions are promoted to
//! `window.*` and called from here with JSON-serialised arguments.

static LINE_CHART_JS: &str = include_str!("../assets/js/line-chart.js");

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('EXD JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Quote a string as a JS string literal.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Initialize the chart script with a wait-for-Chart.js polling loop.
///
/// The script is evaluated at global scope via indirect eval once Chart.js
/// has loaded, then its functions are promoted to `window.*` explicitly.
/// Safe to call more than once.
pub fn init_charts() {
    let store_js = format!("window.__exdChartScripts = {};", js_string(LINE_CHART_JS));
    let _ = js_sys::eval(&store_js);

    let init_js = r#"
        (function() {
            if (window.__exdChartsReady || window.__exdChartsInitializing) return;
            window.__exdChartsInitializing = true;
            var waitForChart = setInterval(function() {
                if (typeof Chart !== 'undefined') {
                    clearInterval(waitForChart);
                    (0, eval)(window.__exdChartScripts);
                    delete window.__exdChartScripts;
                    if (typeof renderLineChart !== 'undefined') window.renderLineChart = renderLineChart;
                    if (typeof destroyLineChart !== 'undefined') window.destroyLineChart = destroyLineChart;
                    window.__exdChartsReady = true;
                    console.log('EXD charts initialized');
                }
            }, 100);
        })();
    "#;
    let _ = js_sys::eval(init_js);
}

/// Render a line chart into the canvas with the given id.
///
/// Polls until Chart.js is ready and the canvas exists, then renders.
pub fn render_line_chart(canvas_id: &str, series_json: &str) {
    let id = js_string(canvas_id);
    let data = js_string(series_json);
    call_js(&format!(
        r#"
        (function() {{
            var poll = setInterval(function() {{
                if (window.__exdChartsReady &&
                    typeof window.renderLineChart !== 'undefined' &&
                    document.getElementById({id})) {{
                    clearInterval(poll);
                    try {{
                        window.renderLineChart({id}, {data});
                    }} catch(e) {{ console.error('[EXD] renderLineChart error:', e); }}
                }}
            }}, 100);
        }})();
        "#,
    ));
}

/// Destroy the Chart.js instance bound to the canvas, if any.
pub fn destroy_chart(canvas_id: &str) {
    call_js(&format!(
        "if (typeof window.destroyLineChart !== 'undefined') window.destroyLineChart({});",
        js_string(canvas_id)
    ));
}

/// Show a blocking browser alert.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#[cfg(test)]
mod tests {
    use super::js_string;

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(js_string("chart"), "\"chart\"");
        assert_eq!(
            js_string(r#"{"title":"IPC"}"#),
            r#""{\"title\":\"IPC\"}""#
        );
    }
}
