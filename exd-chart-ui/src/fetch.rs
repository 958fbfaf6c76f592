//! Browser `fetch` for dataset files.

use anyhow::anyhow;
use exd_data::pipeline::FetchResponse;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

fn js_error(value: JsValue) -> anyhow::Error {
    anyhow!("{:?}", value)
}

/// GET `url` (relative to the page) and return its status and text body.
///
/// Non-success statuses are returned as responses, not errors; only a
/// request that never completes is an `Err`.
pub async fn fetch_text(url: &str) -> anyhow::Result<FetchResponse> {
    let window = web_sys::window().ok_or_else(|| anyhow!("no global window"))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    let response_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: Response = response_value.dyn_into().map_err(js_error)?;

    let status = response.status();
    let body = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .unwrap_or_default();
    Ok(FetchResponse::new(status, body))
}
