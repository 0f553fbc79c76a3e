use yew::prelude::*;

use vista_common::{
    format::SpeedUnit,
    i18n::Language,
    preferences::{LayoutSlider, PreferenceChange, Preferences, Theme},
};

use super::forms::{
    checkbox::Checkbox,
    radio_group::{Choice, RadioGroup},
    slider::Slider,
};

#[derive(Properties, PartialEq)]
pub struct Props {
    pub preferences: Preferences,
    pub open: bool,
    pub on_change: Callback<PreferenceChange>,
    pub on_close: Callback<()>,
}

fn choices<T: Copy>(
    items: &[T],
    value: impl Fn(T) -> &'static str,
    label: impl Fn(T) -> String,
) -> Vec<Choice> {
    items
        .iter()
        .map(|item| Choice {
            value: value(*item).into(),
            label: label(*item).into(),
        })
        .collect()
}

#[function_component(SettingsPanel)]
pub fn settings_panel(props: &Props) -> Html {
    let prefs = &props.preferences;
    let lang = prefs.language;
    let t = |key: &str| AttrValue::from(lang.t(key).to_string());

    let languages = choices(&Language::ALL, Language::tag, |l| {
        lang.t(&format!("language.{}", l.tag())).to_string()
    });
    let on_language = discard_output(
        props
            .on_change
            .filter_reform(|tag: String| tag.parse().ok().map(PreferenceChange::Language)),
    );

    let themes = choices(&Theme::ALL, Theme::tag, |theme| {
        lang.t(theme.label_key()).to_string()
    });
    let on_theme = discard_output(
        props
            .on_change
            .filter_reform(|tag: String| Theme::from_tag(&tag).map(PreferenceChange::Theme)),
    );

    let units = choices(&SpeedUnit::ALL, SpeedUnit::tag, |unit| {
        lang.t(unit.label_key()).to_string()
    });
    let on_unit =
        discard_output(props.on_change.filter_reform(|tag: String| {
            SpeedUnit::from_tag(&tag).map(PreferenceChange::SpeedUnit)
        }));

    let on_details = props.on_change.reform(PreferenceChange::ShowDetails);
    let on_speed = props.on_change.reform(PreferenceChange::ShowSpeed);

    let sliders = LayoutSlider::ALL
        .iter()
        .map(|slider| {
            let slider = *slider;
            let (min, max) = slider.range();
            let on_input = props.on_change.reform(move |value: String| {
                PreferenceChange::Layout(slider, slider.parse(Some(&value)))
            });
            html! {
                <Slider
                    id={slider.id()}
                    label={t(slider.label_key())}
                    value={prefs.layout.get(slider)}
                    {min}
                    {max}
                    {on_input}
                />
            }
        })
        .collect::<Html>();

    let on_close = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <aside id="settings-panel" class="settings" aria-hidden={(!props.open).to_string()} hidden={!props.open}>
            <header>
                <h2>{t("settings.title")}</h2>
                <button class="close" aria-label={t("nav.close")} onclick={on_close}>{"×"}</button>
            </header>

            <fieldset>
                <legend>{t("settings.language")}</legend>
                <RadioGroup name="language" choices={languages} selected={lang.tag()} on_change={on_language} />
            </fieldset>

            <fieldset>
                <legend>{t("settings.theme")}</legend>
                <RadioGroup name="theme" choices={themes} selected={prefs.theme.tag()} on_change={on_theme} />
            </fieldset>

            <fieldset>
                <legend>{t("settings.details")}</legend>
                <Checkbox id="details-toggle" label={t("settings.detailsToggle")} checked={prefs.show_details} on_change={on_details} />
            </fieldset>

            <fieldset>
                <legend>{t("settings.speed")}</legend>
                <Checkbox id="speed-toggle" label={t("settings.speedToggle")} checked={prefs.show_speed} on_change={on_speed} />
            </fieldset>

            <fieldset>
                <legend>{t("settings.speedUnit")}</legend>
                <RadioGroup name="speed-unit" choices={units} selected={prefs.speed_unit.tag()} on_change={on_unit} />
            </fieldset>

            <fieldset>
                {sliders}
            </fieldset>
        </aside>
    }
}

/// Adapts a filtering callback to the `Callback<T>` shape that props expect.
fn discard_output<T: 'static, O: 'static>(callback: Callback<T, O>) -> Callback<T> {
    Callback::from(move |value: T| {
        callback.emit(value);
    })
}
