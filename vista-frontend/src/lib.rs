//! Yew frontend and service worker for vista
#![warn(missing_docs)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::use_self)]
// This code will not be used on concurrent threads.
#![allow(clippy::future_not_send)]
#![allow(clippy::missing_errors_doc)]

mod components;
pub mod services;
pub mod worker;

use futures::StreamExt;
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use vista_common::{
    config::Config,
    controller::{Controller, Msg},
    preferences::{Defaults, KeyValueStore, Theme},
    version::{self, Version},
};

use components::{
    readout::{CoordinateModule, ValueModule},
    settings::SettingsPanel,
    status::StatusBanner,
};
use services::{
    events::Listener,
    geolocation::BrowserGeolocation,
    page,
    registration::{self, Registration},
    storage,
    wake_lock::ScreenWakeLock,
};

fn footer() -> Html {
    html! {
        <footer>
            if let Some(build_date) = version::BUILD_DATE {
                <div>{ format!("Built on {build_date}") }</div>
            }
            if let Some(vcs_ref) = version::VCS_REF {
                <div>{ format!("VCS ref: {vcs_ref}") }</div>
            }
        </footer>
    }
}

enum AppMsg {
    Loaded(Config),
    Update(Msg),
    Interacted,
}

struct App {
    controller: Option<Controller<BrowserGeolocation, Box<dyn KeyValueStore>>>,
    wake_lock: ScreenWakeLock,
    _registration: Option<Registration>,
    _listeners: Vec<Listener>,
}

impl App {
    fn listeners(ctx: &Context<Self>) -> Vec<Listener> {
        let document = gloo_utils::document();
        let window = gloo_utils::window();

        let on_visibility = ctx
            .link()
            .callback(|_| AppMsg::Update(Msg::Visibility(page::is_visible())));
        let on_page_hide = ctx.link().callback(|_| AppMsg::Update(Msg::Teardown));
        let on_key = ctx.link().batch_callback(|e: Event| {
            let e = e.dyn_into::<KeyboardEvent>().ok()?;
            (e.key() == "Escape").then_some(AppMsg::Update(Msg::Settings(Some(false))))
        });
        let on_pointer = ctx.link().callback(|_| AppMsg::Interacted);

        vec![
            Listener::new(&document, "visibilitychange", on_visibility),
            Listener::new(&window, "pagehide", on_page_hide),
            Listener::new(&document, "keydown", on_key),
            Listener::new(&document, "pointerdown", on_pointer),
        ]
    }

    fn start(&mut self, ctx: &Context<Self>, config: &Config) {
        let (provider, mut events) = BrowserGeolocation::new();
        let link = ctx.link().clone();
        spawn_local(async move {
            while let Some(event) = events.next().await {
                link.send_message(AppMsg::Update(Msg::Feed(event)));
            }
        });

        let defaults = Defaults {
            language: config.default_language,
            theme: if page::prefers_dark() {
                Theme::Dark
            } else {
                Theme::Light
            },
        };
        let mut controller =
            Controller::new(provider, storage::open_preferences(), config, defaults);
        controller.start();
        if !page::is_visible() {
            controller.update(Msg::Visibility(false));
        }
        self.controller = Some(controller);
    }
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link()
            .send_future(async { AppMsg::Loaded(services::config::load().await) });
        App {
            controller: None,
            wake_lock: ScreenWakeLock::default(),
            _registration: registration::register(&Version::get()),
            _listeners: Self::listeners(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::Loaded(config) => {
                self.start(ctx, &config);
                true
            }
            AppMsg::Update(msg) => {
                match msg {
                    Msg::Visibility(true) => self.wake_lock.request(),
                    Msg::Visibility(false) | Msg::Teardown => self.wake_lock.release(),
                    _ => {}
                }
                self.controller
                    .as_mut()
                    .is_some_and(|controller| controller.update(msg))
            }
            AppMsg::Interacted => {
                self.wake_lock.request();
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(controller) = &self.controller else {
            return html! {};
        };
        let view = controller.view();
        let lang = view.language;
        let t = |key: &str| AttrValue::from(lang.t(key).to_string());

        let link = ctx.link();
        let on_menu = link.callback(|_: MouseEvent| AppMsg::Update(Msg::Settings(None)));
        let on_backdrop =
            link.callback(|_: MouseEvent| AppMsg::Update(Msg::Settings(Some(false))));
        let on_close = link.callback(|()| AppMsg::Update(Msg::Settings(Some(false))));
        let on_change = link.callback(|change| AppMsg::Update(Msg::Preference(change)));
        let on_retry = link.callback(|()| AppMsg::Update(Msg::Retry));

        html! {
            <>
                <header class="topbar">
                    <h1 class="title">{t("app.title")}</h1>
                    <button
                        id="menu-toggle"
                        class="menu"
                        aria-label={view.menu_label.clone()}
                        aria-expanded={view.settings_open.to_string()}
                        aria-controls="settings-panel"
                        onclick={on_menu}
                    >{"☰"}</button>
                </header>

                <main class="readings">
                    <CoordinateModule id="longitude" view={view.longitude.clone()} />
                    <CoordinateModule id="latitude" view={view.latitude.clone()} />
                    <ValueModule id="altitude" label={t("label.altitude")} value={view.altitude.clone()} />
                    <ValueModule id="speed" label={t("label.speed")} value={view.speed.clone()} visible={view.show_speed} />
                    <ValueModule id="timestamp" label={t("label.timestamp")} value={view.timestamp.clone()} visible={view.show_details} />
                    <ValueModule id="accuracy" label={t("label.accuracy")} value={view.accuracy.clone()} visible={view.show_details} />
                </main>

                <StatusBanner status={view.status.clone()} retry_label={t("retry")} {on_retry} />

                <div class="overlay" hidden={!view.settings_open} onclick={on_backdrop}></div>
                <SettingsPanel preferences={*controller.preferences()} open={view.settings_open} {on_change} {on_close} />

                { footer() }
            </>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if let Some(controller) = &self.controller {
            page::apply_view(&controller.view());
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.wake_lock.release();
        if let Some(controller) = &mut self.controller {
            controller.update(Msg::Teardown);
        }
    }
}

/// The entry point for the page and for the service worker.
#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    if web_sys::window().is_none() {
        // Loaded by sw.js, which drives the worker itself.
        return Ok(());
    }
    yew::Renderer::<App>::new().render();
    Ok(())
}
