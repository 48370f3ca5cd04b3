//! DOM and console access helpers.
//!
//! Thin wrappers over `web-sys` so the rest of the crate can stay
//! `Option`-driven instead of juggling `JsValue` errors.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Window};

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get the current document.
#[inline]
pub fn document() -> Option<Document> {
    window()?.document()
}

/// Run `callback` once the document's content has been parsed.
///
/// Runs immediately when the document has already left the `loading`
/// state; otherwise registers a one-shot `DOMContentLoaded` listener.
/// The wait is not cancellable and the callback fires at most once.
pub fn on_content_loaded(callback: impl FnOnce() + 'static) {
    let Some(document) = document() else {
        return;
    };

    if document.ready_state() == "loading" {
        let listener = Closure::once_into_js(callback);
        let listener: &js_sys::Function = listener.unchecked_ref();
        let _ = document.add_event_listener_with_callback("DOMContentLoaded", listener);
    } else {
        callback();
    }
}

// =============================================================================
// Console Logging
// =============================================================================

/// Log a warning to the browser console (stderr on native targets).
pub fn console_warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("warning: {message}");
}

/// Log an error to the browser console (stderr on native targets).
pub fn console_error(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("error: {message}");
}
