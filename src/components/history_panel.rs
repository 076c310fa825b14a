use crate::model::Transform3;
use crate::util::relay;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct HistoryPanelProps {
    pub cursor: usize,
    pub len: usize,
    pub current: Transform3,
    pub dragging: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub on_undo: Callback<()>,
    pub on_redo: Callback<()>,
    pub on_open_settings: Callback<()>,
}

#[function_component]
pub fn HistoryPanel(props: &HistoryPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;";
    let value_style = "margin-left:auto; font-variant-numeric:tabular-nums; font-weight:600;";
    html! {<div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px 12px; min-width:220px; display:flex; flex-direction:column; gap:6px; font-size:14px;">
        <div style={row_style}>
            <span>{"History"}</span>
            <span style={value_style}>{ format!("{} / {}", props.cursor + 1, props.len) }</span>
        </div>
        <div style={row_style}>
            <span>{"Position"}</span>
            <span style={value_style}>{ props.current.to_string() }</span>
        </div>
        { if props.dragging { html!{ <div style="font-size:11px; color:#f2cc60;">{"Dragging…"}</div> } } else { html!{} } }
        <div style="display:flex; gap:6px;">
            <button onclick={relay::<MouseEvent>(&props.on_undo)} disabled={!props.can_undo} style="flex:1;">{"Undo"}</button>
            <button onclick={relay::<MouseEvent>(&props.on_redo)} disabled={!props.can_redo} style="flex:1;">{"Redo"}</button>
        </div>
        <button onclick={relay::<MouseEvent>(&props.on_open_settings)}>{"Settings"}</button>
        <div style="font-size:11px; opacity:0.7;">{"⌘/Ctrl+Z undo · ⌘/Ctrl+Shift+Z redo · Shift-drag moves up/down"}</div>
    </div>}
}
