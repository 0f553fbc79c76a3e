//! DOM event listeners that detach when dropped
use wasm_bindgen::{prelude::Closure, JsCast};
use web_sys::{Event, EventTarget};
use yew::Callback;

/// An event listener, removed from its target when dropped.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    /// Call `callback` whenever `target` fires an event of this kind.
    pub fn new(target: &EventTarget, kind: &'static str, callback: Callback<Event>) -> Self {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| callback.emit(event));
        if let Err(err) =
            target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        {
            tracing::error!("Failed to listen for {kind}: {err:?}");
        }
        Self {
            target: target.clone(),
            kind,
            closure,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}
