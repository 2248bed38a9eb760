use puzzle_core::{PuzzleError, Size};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlImageElement, Response, Window};

/// Current viewport in CSS pixels, when the window reports one.
pub fn viewport(window: &Window) -> Option<Size> {
    let w = window.inner_width().ok()?.as_f64()?;
    let h = window.inner_height().ok()?.as_f64()?;
    Some(Size::new(w, h))
}

/// Monotonic clock on the same time base as animation frame timestamps.
pub fn now_ms(window: &Window) -> f64 {
    window
        .performance()
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Fresh generator seeded from the browser's `Math.random`.
pub fn seeded_rng() -> SmallRng {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    SmallRng::seed_from_u64((hi << 32) | lo)
}

/// Load and decode an image. Any failure is an image error; nothing is
/// retried.
pub async fn load_image(url: &str) -> Result<HtmlImageElement, PuzzleError> {
    let img = HtmlImageElement::new()
        .map_err(|e| PuzzleError::ImageResourceUnavailable(format!("{e:?}")))?;
    img.set_cross_origin(Some("anonymous"));
    img.set_src(url);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| PuzzleError::ImageResourceUnavailable(format!("{url}: {e:?}")))?;
    Ok(img)
}

/// Resolve an asset path against `window.__BASE_URL`, which the host page
/// may set when the bundle is served from a sub-path.
pub fn asset_url(path: &str) -> String {
    let base = web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("__BASE_URL")).ok())
        .and_then(|v| v.as_string());
    join_base(base.as_deref().unwrap_or("/"), path)
}

fn join_base(base: &str, path: &str) -> String {
    let path = path.trim();
    if ["http://", "https://", "data:", "blob:"]
        .iter()
        .any(|scheme| path.starts_with(scheme))
    {
        return path.to_owned();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

async fn fetch_text(window: &Window, url: &str) -> Result<String, JsValue> {
    let resp: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", resp.status())));
    }
    JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("body is not text"))
}

/// Body of the first URL in `urls` that answers with text.
pub async fn fetch_first_text(window: &Window, urls: &[String]) -> Result<String, PuzzleError> {
    let mut last = String::from("no URL to try");
    for url in urls {
        match fetch_text(window, url).await {
            Ok(text) => return Ok(text),
            Err(e) => {
                log::debug!("{url}: {e:?}");
                last = format!("{url}: {e:?}");
            }
        }
    }
    Err(PuzzleError::ImageResourceUnavailable(format!(
        "image catalog not reachable ({last})"
    )))
}

/// Decoded value of `key` in a `location.search` string.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| url_decode(v))
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_values_are_decoded() {
        let q = "?theme=sea%20life&minutes=2&name=a+b";
        assert_eq!(get_query_param(q, "theme").as_deref(), Some("sea life"));
        assert_eq!(get_query_param(q, "minutes").as_deref(), Some("2"));
        assert_eq!(get_query_param(q, "name").as_deref(), Some("a b"));
        assert_eq!(get_query_param(q, "rows"), None);
    }

    #[test]
    fn flag_without_value_reads_empty() {
        assert_eq!(get_query_param("?debug&x=1", "debug").as_deref(), Some(""));
    }

    #[test]
    fn asset_paths_join_the_base_once() {
        assert_eq!(join_base("/", "images.json"), "/images.json");
        assert_eq!(join_base("/", "/img/a.png"), "/img/a.png");
        assert_eq!(join_base("/app/", "img/a.png"), "/app/img/a.png");
        assert_eq!(join_base("https://cdn.test/app", "a.png"), "https://cdn.test/app/a.png");
        assert_eq!(join_base("/app/", " data:image/png;base64,AA"), "data:image/png;base64,AA");
        assert_eq!(join_base("/app/", "https://x.test/b.png"), "https://x.test/b.png");
    }
}
