use web_sys::HtmlInputElement;
use yew::prelude::*;

/// One choice in a [`RadioGroup`].
#[derive(Clone, PartialEq)]
pub struct Choice {
    pub value: AttrValue,
    pub label: AttrValue,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub name: AttrValue,
    pub choices: Vec<Choice>,
    pub selected: AttrValue,
    pub on_change: Callback<String>,
}

#[function_component(RadioGroup)]
pub fn radio_group(props: &Props) -> Html {
    props
        .choices
        .iter()
        .map(|choice| {
            let id = format!("{}-{}", props.name, choice.value);
            let on_change = props
                .on_change
                .reform(|e: Event| e.target_unchecked_into::<HtmlInputElement>().value());
            html! {
                <label class="choice" for={id.clone()}>
                    <input
                        type="radio"
                        id={id}
                        name={props.name.clone()}
                        value={choice.value.clone()}
                        checked={choice.value == props.selected}
                        onchange={on_change}
                    />
                    <span>{choice.label.clone()}</span>
                </label>
            }
        })
        .collect()
}
