//! The browser's geolocation API as a [`LocationProvider`]
use std::collections::HashMap;

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use js_sys::Reflect;
use tracing::{debug, error};
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::{Geolocation, Position, PositionError, PositionOptions};

use vista_common::{
    feed::{FeedEvent, FeedEventKind, LocationProvider, WatchError},
    position::{PositionReading, ProviderError, WatchId, WatchOptions},
};

struct Watch {
    handle: i32,
    _on_position: Closure<dyn FnMut(Position)>,
    _on_error: Closure<dyn FnMut(PositionError)>,
}

/// Watches `navigator.geolocation`, sending every result down a channel.
pub struct BrowserGeolocation {
    tx: UnboundedSender<FeedEvent>,
    watches: HashMap<WatchId, Watch>,
    next_id: i32,
}

fn geolocation() -> Option<Geolocation> {
    let navigator = web_sys::window()?.navigator();
    if !Reflect::has(&navigator, &JsValue::from_str("geolocation")).unwrap_or(false) {
        return None;
    }
    navigator.geolocation().ok()
}

#[allow(clippy::cast_possible_truncation)]
fn reading(position: &Position) -> PositionReading {
    let coords = position.coords();
    PositionReading {
        longitude: coords.longitude(),
        latitude: coords.latitude(),
        altitude: coords.altitude(),
        speed: coords.speed(),
        accuracy: Some(coords.accuracy()),
        timestamp: position.timestamp() as i64,
    }
}

fn send(tx: &UnboundedSender<FeedEvent>, watch: WatchId, kind: FeedEventKind) {
    if tx.unbounded_send(FeedEvent { watch, kind }).is_err() {
        debug!("Dropping event for {watch:?}, nobody is listening");
    }
}

impl BrowserGeolocation {
    /// Create the provider and the stream its events arrive on.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<FeedEvent>) {
        let (tx, rx) = unbounded();
        let provider = Self {
            tx,
            watches: HashMap::new(),
            next_id: 0,
        };
        (provider, rx)
    }
}

impl LocationProvider for BrowserGeolocation {
    fn watch(&mut self, options: &WatchOptions) -> Result<WatchId, WatchError> {
        let geolocation = geolocation().ok_or(WatchError::Unsupported)?;

        self.next_id += 1;
        let id = WatchId(self.next_id);

        let on_position = {
            let tx = self.tx.clone();
            Closure::<dyn FnMut(_)>::new(move |position: Position| {
                send(&tx, id, FeedEventKind::Position(reading(&position)));
            })
        };

        let on_error = {
            let tx = self.tx.clone();
            Closure::<dyn FnMut(_)>::new(move |err: PositionError| {
                debug!("Geolocation error {}: {}", err.code(), err.message());
                let error = ProviderError::from_code(err.code());
                send(&tx, id, FeedEventKind::Error(error));
            })
        };

        let mut position_options = PositionOptions::new();
        position_options
            .enable_high_accuracy(options.high_accuracy)
            .timeout(options.timeout_ms)
            .maximum_age(options.max_cache_age_ms);

        let handle = geolocation
            .watch_position_with_error_callback_and_options(
                on_position.as_ref().unchecked_ref(),
                Some(on_error.as_ref().unchecked_ref()),
                &position_options,
            )
            .map_err(|err| {
                error!("watchPosition failed: {err:?}");
                WatchError::Failed(format!("{err:?}"))
            })?;

        debug!("Watching {id:?} as browser watch {handle}");
        self.watches.insert(
            id,
            Watch {
                handle,
                _on_position: on_position,
                _on_error: on_error,
            },
        );
        Ok(id)
    }

    fn clear_watch(&mut self, id: WatchId) {
        if let Some(watch) = self.watches.remove(&id) {
            if let Some(geolocation) = geolocation() {
                geolocation.clear_watch(watch.handle);
            }
            debug!("Cleared {id:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]

    use js_sys::Object;
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn object(fields: &[(&str, JsValue)]) -> Object {
        let object = Object::new();
        for (name, value) in fields {
            Reflect::set(&object, &JsValue::from_str(name), value).unwrap();
        }
        object
    }

    #[wasm_bindgen_test]
    fn test_reading_from_position() {
        let coords = object(&[
            ("longitude", 121.4737.into()),
            ("latitude", 31.2304.into()),
            ("altitude", JsValue::NULL),
            ("speed", 2.78.into()),
            ("accuracy", 12.4.into()),
        ]);
        let position: Position =
            object(&[("coords", coords.into()), ("timestamp", 1_715_828_645_678_f64.into())])
                .unchecked_into();

        let reading = reading(&position);
        assert_eq!(reading.longitude, 121.4737);
        assert_eq!(reading.latitude, 31.2304);
        assert_eq!(reading.altitude, None);
        assert_eq!(reading.speed, Some(2.78));
        assert_eq!(reading.accuracy, Some(12.4));
        assert_eq!(reading.timestamp, 1_715_828_645_678);
    }

    #[wasm_bindgen_test]
    fn test_error_codes() {
        let error: PositionError = object(&[("code", 1.into()), ("message", "denied".into())])
            .unchecked_into();
        assert_eq!(
            ProviderError::from_code(error.code()),
            ProviderError::PermissionDenied
        );
    }
}
