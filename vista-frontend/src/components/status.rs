use yew::prelude::*;

use vista_common::view::StatusView;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub status: Option<StatusView>,
    pub retry_label: AttrValue,
    pub on_retry: Callback<()>,
}

#[function_component(StatusBanner)]
pub fn status_banner(props: &Props) -> Html {
    let Some(status) = &props.status else {
        return html! { <div id="status" class="status" hidden=true></div> };
    };
    let on_retry = props.on_retry.reform(|_: MouseEvent| ());
    html! {
        <div id="status" class="status" role="status">
            <span class="message">{status.message.clone()}</span>
            if status.retry {
                <button class="retry" onclick={on_retry}>{props.retry_label.clone()}</button>
            }
        </div>
    }
}
