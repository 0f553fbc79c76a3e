//! Register the service worker and switch to new versions as they arrive
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use js_sys::{Reflect, JSON};
use tracing::{debug, error, info};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{ServiceWorker, ServiceWorkerRegistration, ServiceWorkerState};
use yew::Callback;

use vista_common::{offline::ControlMessage, version::Version};

use super::events::Listener;

/// The worker script, relative to the page.
pub const WORKER_SCRIPT: &str = "./sw.js";

/// Url of the worker for a build; a new build gives a new url.
#[must_use]
pub fn worker_url(version: &Version) -> String {
    format!("{WORKER_SCRIPT}?v={}", version.build_key())
}

fn skip_waiting(worker: &ServiceWorker) {
    let message = serde_json::to_string(&ControlMessage::SkipWaiting)
        .map_err(|err| JsValue::from_str(&err.to_string()))
        .and_then(|json| JSON::parse(&json));
    match message.and_then(|message| worker.post_message(&message)) {
        Ok(()) => debug!("Asked waiting worker to take over"),
        Err(err) => error!("Failed to message worker: {err:?}"),
    }
}

/// Returns `true` only the first time it is called with this flag.
fn first_change(refreshing: &Cell<bool>) -> bool {
    !refreshing.replace(true)
}

fn reload() {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(err) = window.location().reload() {
        error!("Failed to reload page: {err:?}");
    }
}

/// Keeps the listeners for a registration alive.
pub struct Registration {
    _listeners: Rc<RefCell<Vec<Listener>>>,
}

fn watch_installing(
    registration: &ServiceWorkerRegistration,
    listeners: &Rc<RefCell<Vec<Listener>>>,
) {
    let Some(worker) = registration.installing() else {
        return;
    };
    let callback = {
        let worker = worker.clone();
        Callback::from(move |_| {
            if worker.state() == ServiceWorkerState::Installed {
                skip_waiting(&worker);
            }
        })
    };
    listeners
        .borrow_mut()
        .push(Listener::new(&worker, "statechange", callback));
}

/// Register the worker.
///
/// Returns `None` if the browser has no service worker support.
#[must_use]
pub fn register(version: &Version) -> Option<Registration> {
    let navigator = web_sys::window()?.navigator();
    if !Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false) {
        info!("Service workers not supported, no offline support");
        return None;
    }
    let container = navigator.service_worker();
    let listeners = Rc::new(RefCell::new(Vec::new()));

    let refreshing = Rc::new(Cell::new(false));
    let on_controller_change = Callback::from(move |_| {
        if first_change(&refreshing) {
            info!("New service worker in control, reloading");
            reload();
        }
    });
    listeners.borrow_mut().push(Listener::new(
        &container,
        "controllerchange",
        on_controller_change,
    ));

    let url = worker_url(version);
    let pending = listeners.clone();
    spawn_local(async move {
        let registration = match JsFuture::from(container.register(&url)).await {
            Ok(registration) => registration.unchecked_into::<ServiceWorkerRegistration>(),
            Err(err) => {
                error!("Service worker registration failed: {err:?}");
                return;
            }
        };
        info!("Registered service worker {url}");

        if let Some(waiting) = registration.waiting() {
            skip_waiting(&waiting);
        }

        let on_update_found = {
            let registration = registration.clone();
            let listeners = pending.clone();
            Callback::from(move |_| watch_installing(&registration, &listeners))
        };
        pending.borrow_mut().push(Listener::new(
            &registration,
            "updatefound",
            on_update_found,
        ));
    });

    Some(Registration {
        _listeners: listeners,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_url() {
        let version = Version {
            build_date: "2024-05-16".into(),
            vcs_ref: "abc123".into(),
        };
        assert_eq!(worker_url(&version), "./sw.js?v=abc123");
    }

    #[test]
    fn test_reload_only_once() {
        let refreshing = Cell::new(false);
        assert!(first_change(&refreshing));
        assert!(!first_change(&refreshing));
        assert!(!first_change(&refreshing));
    }
}
