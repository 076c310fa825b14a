use yew::Callback;

pub fn format_distance(d: f64) -> String {
    if d >= 100.0 {
        format!("{:.0}", d)
    } else if d >= 10.0 {
        format!("{:.1}", d)
    } else {
        format!("{:.2}", d)
    }
}

/// Debug trace to the browser console. Silent in release builds and off-wasm.
pub fn clog(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    if cfg!(debug_assertions) {
        web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(msg));
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

/// Recoverable failure report; always emitted on wasm.
pub fn cwarn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

/// Adapt a unit callback to a DOM event handler that ignores the event.
pub fn relay<E: 'static>(cb: &Callback<()>) -> Callback<E> {
    let cb = cb.clone();
    Callback::from(move |_: E| cb.emit(()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_label_precision_follows_magnitude() {
        assert_eq!(format_distance(250.4), "250");
        assert_eq!(format_distance(42.26), "42.3");
        assert_eq!(format_distance(8.666), "8.67");
    }
}
