use yew::prelude::*;

use vista_common::view::CoordinateView;

#[derive(Properties, PartialEq)]
pub struct CoordinateProps {
    pub id: AttrValue,
    pub view: CoordinateView,
}

#[function_component(CoordinateModule)]
pub fn coordinate_module(props: &CoordinateProps) -> Html {
    html! {
        <section class="module" data-module={props.id.clone()}>
            <div class="label">{props.view.label.clone()}</div>
            <div class="value big">{props.view.dms.clone()}</div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct ValueProps {
    pub id: AttrValue,
    pub label: AttrValue,
    pub value: AttrValue,
    #[prop_or(true)]
    pub visible: bool,
}

#[function_component(ValueModule)]
pub fn value_module(props: &ValueProps) -> Html {
    html! {
        <section class="module" data-module={props.id.clone()} hidden={!props.visible}>
            <div class="label">{props.label.clone()}</div>
            <div class="value">{props.value.clone()}</div>
        </section>
    }
}
