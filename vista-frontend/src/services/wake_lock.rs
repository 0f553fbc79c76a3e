//! Keep the screen on while the page is visible
//!
//! The Screen Wake Lock API is not in `web-sys` without unstable flags, so
//! the two calls needed are bound here.
use std::{cell::RefCell, rc::Rc};

use js_sys::{Promise, Reflect};
use tap::Pipe;
use tracing::{debug, info};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::{spawn_local, JsFuture};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = js_sys::Object)]
    type WakeLock;

    #[wasm_bindgen(method)]
    fn request(this: &WakeLock, kind: &str) -> Promise;

    #[wasm_bindgen(extends = js_sys::Object)]
    type WakeLockSentinel;

    #[wasm_bindgen(method)]
    fn release(this: &WakeLockSentinel) -> Promise;
}

fn wake_lock() -> Option<WakeLock> {
    let navigator = web_sys::window()?.navigator();
    Reflect::get(&navigator, &JsValue::from_str("wakeLock"))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())?
        .unchecked_into::<WakeLock>()
        .pipe(Some)
}

#[derive(Default)]
enum State {
    #[default]
    Released,
    Requesting,
    Held(WakeLockSentinel),
}

/// A screen wake lock that is requested and released on demand.
///
/// Failures are logged and otherwise ignored.
#[derive(Clone, Default)]
pub struct ScreenWakeLock {
    state: Rc<RefCell<State>>,
}

impl ScreenWakeLock {
    /// Ask for the lock unless it is already held or being requested.
    pub fn request(&self) {
        if !matches!(*self.state.borrow(), State::Released) {
            return;
        }
        let Some(lock) = wake_lock() else {
            debug!("Screen wake lock not supported");
            return;
        };

        *self.state.borrow_mut() = State::Requesting;
        let state = self.state.clone();
        spawn_local(async move {
            let result = JsFuture::from(lock.request("screen")).await;
            let mut state = state.borrow_mut();
            match result {
                Ok(sentinel) if matches!(*state, State::Requesting) => {
                    debug!("Screen wake lock acquired");
                    *state = State::Held(sentinel.unchecked_into());
                }
                Ok(sentinel) => {
                    // Released while the request was in flight.
                    let sentinel: WakeLockSentinel = sentinel.unchecked_into();
                    drop(sentinel.release());
                }
                Err(err) => {
                    info!("Screen wake lock refused: {err:?}");
                    *state = State::Released;
                }
            }
        });
    }

    /// Give the lock back.
    pub fn release(&self) {
        let previous = std::mem::take(&mut *self.state.borrow_mut());
        if let State::Held(sentinel) = previous {
            debug!("Releasing screen wake lock");
            spawn_local(async move {
                if let Err(err) = JsFuture::from(sentinel.release()).await {
                    debug!("Wake lock release failed: {err:?}");
                }
            });
        }
    }
}
