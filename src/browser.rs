use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use std::future::Future;
use wasm_bindgen::closure::{Closure, WasmClosure, WasmClosureFnOnce};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

#[rustfmt::skip]
use web_sys::{
    CanvasRenderingContext2d,
    Document,
    EventTarget,
    HtmlCanvasElement,
    HtmlImageElement,
    Performance,
    Response,
    Window,
};

// Constants related to HTML elements
mod html {
    pub const CONTEXT_2D: &str = "2d";
}

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| anyhow!("Window not found"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| anyhow!("No Document Found"))
}

pub fn canvas(canvas_id: &str) -> Result<HtmlCanvasElement> {
    document()?
        .get_element_by_id(canvas_id)
        .ok_or_else(|| anyhow!("No Canvas Element found with ID : '{}'", canvas_id))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|element| anyhow!("Error converting {:#?} to HtmlCanvasElement", element))
}

pub fn context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    canvas
        .get_context(html::CONTEXT_2D)
        // Result<Option<Object>, JsValue> : map the JsValue error first, then
        // the missing context, then cast the object
        .map_err(|js_value| anyhow!("Error getting context : {:#?}", js_value))?
        .ok_or_else(|| anyhow!("No 2d context found"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|element| {
            anyhow!(
                "Error converting {:#?} to CanvasRenderingContext2d",
                element
            )
        })
}

pub fn performance() -> Result<Performance> {
    window()?
        .performance()
        .ok_or_else(|| anyhow!("Performance object not found"))
}

pub fn create_html_image_element() -> Result<HtmlImageElement> {
    HtmlImageElement::new()
        .map_err(|err| anyhow!("Could not create image element : {:#?}", err))
}

pub fn request_animation_frame(callback: &Closure<dyn FnMut()>) -> Result<i32> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Cannot request animation frame : {:#?}", err))
}

pub fn cancel_animation_frame(handle: i32) -> Result<()> {
    window()?
        .cancel_animation_frame(handle)
        .map_err(|err| anyhow!("Cannot cancel animation frame {} : {:#?}", handle, err))
}

pub fn set_timeout(callback: &Closure<dyn FnMut()>, delay_ms: i32) -> Result<i32> {
    window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms,
        )
        .map_err(|err| anyhow!("Cannot set timeout : {:#?}", err))
}

pub fn clear_timeout(handle: i32) -> Result<()> {
    window()?.clear_timeout_with_handle(handle);
    Ok(())
}

pub fn closure_once<T, F, A, R>(f: F) -> Closure<T>
where
    T: ?Sized + WasmClosure,
    F: 'static + WasmClosureFnOnce<T, A, R>,
{
    Closure::once(f)
}

pub fn closure_wrap<T: WasmClosure + ?Sized>(data: Box<T>) -> Closure<T> {
    Closure::wrap(data)
}

/// Registers `callback` on `target` and leaks it, the listener lives as long
/// as the page
pub fn add_event_listener<T>(target: &EventTarget, event: &str, callback: Closure<T>) -> Result<()>
where
    T: WasmClosure + ?Sized,
{
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Cannot add '{}' listener : {:#?}", event, err))?;
    callback.forget();
    Ok(())
}

pub fn spawn_local<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

pub async fn fetch_json<T>(json_path: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let resp_value = fetch_with_str(json_path).await?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|element| anyhow!("error converting [{:#?}] to Response", element))?;
    if !resp.ok() {
        return Err(anyhow!(
            "fetching [{}] returned status {}",
            json_path,
            resp.status()
        ));
    }
    let json = resp
        .json()
        .map_err(|err| anyhow!("Could not get JSON from response [{:#?}]", err))?;

    let json_value = JsFuture::from(json)
        .await
        .map_err(|err| anyhow!("error fetching [{:#?}]", err))?;

    serde_wasm_bindgen::from_value(json_value)
        .map_err(|err| anyhow!("error converting response : {:#?}", err))
}

async fn fetch_with_str(resource: &str) -> Result<JsValue> {
    let resp = window()?.fetch_with_str(resource);

    JsFuture::from(resp)
        .await
        .map_err(|err| anyhow!("error fetching : {:#?}", err))
}
