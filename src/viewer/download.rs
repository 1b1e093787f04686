//! SVG download for `HeatView`.
//!
//! The export is rendered off-screen, encoded as a base64 data URL and handed
//! to a temporary anchor element.

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::HtmlAnchorElement;

#[cfg(target_arch = "wasm32")]
use super::{alert, HeatView, SharedState};
#[cfg(target_arch = "wasm32")]
use crate::error::Result;
#[cfg(target_arch = "wasm32")]
use crate::render::{svg_data_url, SvgExportOptions};

#[cfg(target_arch = "wasm32")]
impl HeatView {
    pub(crate) fn download(state: &Rc<RefCell<SharedState>>, options: &SvgExportOptions) {
        let svg = {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            s.chart.export_svg(options.full, &mut s.measure)
        };
        let result = svg.and_then(|svg| trigger_download(&options.file_name(), &svg_data_url(&svg)));
        if let Err(e) = result {
            tracing::error!(error = %e, "svg export failed");
            alert(&e.to_string());
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn trigger_download(file_name: &str, href: &str) -> Result<()> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("No document available")?;
    let body = document.body().ok_or("Document has no body")?;
    let anchor = document
        .create_element("a")
        .map_err(|_| "Failed to create anchor")?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| "Failed to cast anchor")?;
    anchor.set_href(href);
    anchor.set_download(file_name);
    let _ = anchor.style().set_property("display", "none");
    body.append_child(&anchor)
        .map_err(|_| "Failed to attach anchor")?;
    anchor.click();
    let _ = body.remove_child(&anchor);
    tracing::debug!(file_name, bytes = href.len(), "svg download");
    Ok(())
}
