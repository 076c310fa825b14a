use crate::util::relay;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct NoticeToastProps {
    pub message: Option<String>,
    pub on_dismiss: Callback<()>,
}

#[function_component]
pub fn NoticeToast(props: &NoticeToastProps) -> Html {
    let Some(msg) = props.message.clone() else {
        return html! {};
    };
    html! {<div style="position:absolute; top:12px; left:50%; transform:translateX(-50%); background:#2d1416; border:1px solid #f85149; border-radius:8px; padding:8px 12px; display:flex; gap:12px; align-items:center; font-size:13px; max-width:520px;">
        <span>{ msg }</span>
        <button onclick={relay::<MouseEvent>(&props.on_dismiss)} style="padding:2px 8px;">{"Dismiss"}</button>
    </div>}
}
