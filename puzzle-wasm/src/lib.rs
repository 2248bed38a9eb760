use std::cell::RefCell;
use std::rc::Rc;

use puzzle_core::{Engine, ImageCatalog, PuzzleError, PuzzleOptions};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

mod canvas;
mod constants;
mod frame;
mod params;
mod state;
mod utils;

use crate::canvas::{CanvasSurface, CountdownLabel};
use crate::constants::{AUTO_CONTAINER_ID, CATALOG_PATH};
use crate::frame::FrameLoop;
use crate::params::PageParams;
use crate::state::{BOOTED, Run};
use crate::utils::{asset_url, fetch_first_text, load_image, now_ms, seeded_rng, viewport};

// Both types are foreign here, so this cannot be a `From` impl.
fn to_js(e: PuzzleError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Handle to a running puzzle. Dropping it does not stop the animation;
/// call `destroy()`.
#[wasm_bindgen]
pub struct TimedPuzzle {
    run: Rc<RefCell<Run>>,
    frames: FrameLoop,
}

#[wasm_bindgen]
impl TimedPuzzle {
    /// Stop the frame loop and clear the container. Later calls do nothing.
    pub fn destroy(&mut self) {
        if self.frames.is_cancelled() {
            return;
        }
        self.frames.cancel();
        self.run.borrow_mut().teardown();
        log::debug!("puzzle destroyed");
    }

    #[wasm_bindgen(getter)]
    pub fn finished(&self) -> bool {
        self.run.borrow().is_finished()
    }
}

fn parse_options(options: &JsValue) -> Result<PuzzleOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(PuzzleOptions::default());
    }
    let text: String = js_sys::JSON::stringify(options)?.into();
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&format!("bad options: {e}")))
}

async fn launch(
    window: Window,
    document: Document,
    container_id: &str,
    image_url: &str,
    options: PuzzleOptions,
) -> Result<TimedPuzzle, PuzzleError> {
    let container = document.get_element_by_id(container_id).ok_or_else(|| {
        PuzzleError::RenderSurfaceUnavailable(format!("container #{container_id} not found"))
    })?;
    let config = options.resolve(viewport(&window));
    let image = load_image(image_url).await?;

    let surface = CanvasSurface::mount(&document, container)?;
    let countdown = CountdownLabel::attach(&document, surface.container())
        .map_err(|e| PuzzleError::RenderSurfaceUnavailable(format!("{e:?}")))?;
    let mut rng = seeded_rng();
    let engine = Engine::new(config, surface, &image, &mut rng, now_ms(&window))?;
    log::info!(
        "puzzle {}x{} over {} ms from {}",
        engine.config().rows,
        engine.config().cols,
        engine.config().total_duration_ms,
        image_url
    );

    let run = Rc::new(RefCell::new(Run {
        engine: Some(engine),
        countdown,
    }));
    let st = run.clone();
    let frames = FrameLoop::start(window, move |ts| st.borrow_mut().frame(ts));
    Ok(TimedPuzzle { run, frames })
}

/// Build a puzzle from `image_url` inside the element `container_id` and
/// start it. `options` is a plain object with any of `rows`, `cols`,
/// `totalDuration` (ms), `minutes`, `maxRotation`, `maxWidth`, `maxHeight`.
#[wasm_bindgen(js_name = createPuzzle)]
pub async fn create_puzzle(
    container_id: String,
    image_url: String,
    options: JsValue,
) -> Result<TimedPuzzle, JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let options = parse_options(&options)?;
    launch(window, document, &container_id, &image_url, options)
        .await
        .map_err(to_js)
}

/// Pick a random catalog image whose name or tags match `theme`.
async fn resolve_themed_image(window: &Window, theme: &str) -> Result<String, PuzzleError> {
    let candidates = [
        asset_url(CATALOG_PATH),
        format!("/{CATALOG_PATH}"),
        CATALOG_PATH.to_string(),
    ];
    let text = fetch_first_text(window, &candidates).await?;
    let catalog = ImageCatalog::from_json(&text)?;
    let image = catalog.pick(theme, &mut seeded_rng())?;
    log::debug!("theme '{}' resolved to {}", theme, image.name);
    Ok(asset_url(&image.url))
}

async fn boot(window: Window, document: Document, params: PageParams) -> Result<(), PuzzleError> {
    let url = match &params.image {
        Some(url) => asset_url(url),
        None => resolve_themed_image(&window, &params.theme).await?,
    };
    // The old puzzle clears the shared container on release, so it has to
    // go before the new one mounts.
    destroy_active();
    let puzzle = launch(window, document, AUTO_CONTAINER_ID, &url, params.options).await?;
    BOOTED.with(|b| *b.borrow_mut() = Some(puzzle));
    Ok(())
}

/// Tear down the puzzle the page bootstrap started, if any.
#[wasm_bindgen(js_name = destroyActive)]
pub fn destroy_active() {
    BOOTED.with(|b| {
        if let Some(mut puzzle) = b.borrow_mut().take() {
            puzzle.destroy();
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();

    console_log::init_with_level(if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    })
    .ok();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    // Without the page container we are loaded as a library.
    if document.get_element_by_id(AUTO_CONTAINER_ID).is_none() {
        return Ok(());
    }
    let search = window.location().search().unwrap_or_default();
    let params = PageParams::from_query(&search);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = boot(window, document, params).await {
            log::error!("Failed to start puzzle: {}", err);
        }
    });
    Ok(())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::{Element, HtmlCanvasElement};

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_container(document: &Document, id: &str) -> Element {
        let container = document.create_element("div").unwrap();
        container.set_id(id);
        document.body().unwrap().append_child(&container).unwrap();
        container
    }

    fn test_image_url(document: &Document) -> String {
        let canvas = document
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap();
        canvas.set_width(8);
        canvas.set_height(8);
        canvas.to_data_url().unwrap()
    }

    fn slow_run() -> PuzzleOptions {
        PuzzleOptions {
            rows: Some(2),
            cols: Some(2),
            total_duration_ms: Some(60_000.0),
            ..PuzzleOptions::default()
        }
    }

    #[wasm_bindgen_test]
    async fn destroy_stops_frames_and_clears_the_container() {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        let container = mount_container(&document, "destroy-run");
        let url = test_image_url(&document);

        let mut puzzle = launch(window, document, "destroy-run", &url, slow_run())
            .await
            .unwrap();
        assert_eq!(container.child_element_count(), 2);
        assert!(!puzzle.finished());

        puzzle.destroy();
        assert!(puzzle.frames.is_cancelled());
        assert_eq!(container.child_element_count(), 0);
        // A frame that was already in flight finds nothing to draw.
        assert!(!puzzle.run.borrow_mut().frame(1.0e9));

        puzzle.destroy();
        assert!(puzzle.finished());
        assert_eq!(container.child_element_count(), 0);
        container.remove();
    }

    #[wasm_bindgen_test]
    async fn rebooting_keeps_the_new_page_puzzle() {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        let container = mount_container(&document, AUTO_CONTAINER_ID);
        let params = PageParams {
            image: Some(test_image_url(&document)),
            options: slow_run(),
            ..PageParams::default()
        };

        boot(window.clone(), document.clone(), params.clone())
            .await
            .unwrap();
        boot(window, document, params).await.unwrap();
        assert_eq!(container.child_element_count(), 2);
        assert!(BOOTED.with(|b| b.borrow().as_ref().is_some_and(|p| !p.finished())));

        destroy_active();
        assert_eq!(container.child_element_count(), 0);
        assert!(BOOTED.with(|b| b.borrow().is_none()));
        container.remove();
    }

    #[wasm_bindgen_test]
    async fn missing_container_reaches_js_as_a_message() {
        let err = create_puzzle("no-such-container".into(), "x.png".into(), JsValue::UNDEFINED)
            .await
            .err()
            .unwrap();
        let msg = err.as_string().unwrap();
        assert!(msg.contains("no-such-container"), "{msg}");
    }
}
