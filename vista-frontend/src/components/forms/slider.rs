use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: AttrValue,
    pub label: AttrValue,
    pub value: i32,
    pub min: i32,
    pub max: i32,
    pub on_input: Callback<String>,
}

#[function_component(Slider)]
pub fn slider(props: &Props) -> Html {
    let on_input = props
        .on_input
        .reform(|e: InputEvent| e.target_unchecked_into::<HtmlInputElement>().value());
    let id = props.id.clone();
    html! {
        <div class="slider">
            <label for={id.clone()}>{props.label.clone()}</label>
            <input
                type="range"
                id={id}
                min={props.min.to_string()}
                max={props.max.to_string()}
                step="1"
                value={props.value.to_string()}
                oninput={on_input}
            />
            <output>{format!("{}px", props.value)}</output>
        </div>
    }
}
