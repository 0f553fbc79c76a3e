use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: AttrValue,
    pub label: AttrValue,
    pub checked: bool,
    pub on_change: Callback<bool>,
}

#[function_component(Checkbox)]
pub fn checkbox(props: &Props) -> Html {
    let on_change = props
        .on_change
        .reform(|e: Event| e.target_unchecked_into::<HtmlInputElement>().checked());
    let id = props.id.clone();
    html! {
        <label class="toggle" for={id.clone()}>
            <input type="checkbox" id={id.clone()} name={id} onchange={on_change} checked={props.checked} />
            <span>{props.label.clone()}</span>
        </label>
    }
}
