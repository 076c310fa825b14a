use crate::util::relay;
use yew::prelude::*;

const CLEAR_CONFIRM: &str =
    "This will discard the whole undo history and move the cube back to the origin. Continue?";

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsModalProps {
    pub show: bool,
    pub on_close: Callback<()>,
    pub show_axes: bool,
    pub on_toggle_axes: Callback<()>,
    pub show_lod_panel: bool,
    pub on_toggle_lod_panel: Callback<()>,
    pub on_clear_history: Callback<()>,
    /// Storage key of the history sequence, shown so users can tell which document they edit.
    pub history_key: String,
}

#[derive(Properties, PartialEq, Clone)]
struct ToggleRowProps {
    label: AttrValue,
    checked: bool,
    on_toggle: Callback<()>,
}

#[function_component]
fn ToggleRow(props: &ToggleRowProps) -> Html {
    html! {<label style="display:flex; align-items:center; gap:8px; cursor:pointer;">
        <input type="checkbox" checked={props.checked} onclick={relay::<MouseEvent>(&props.on_toggle)} />
        <span>{ props.label.clone() }</span>
    </label>}
}

#[function_component]
pub fn SettingsModal(props: &SettingsModalProps) -> Html {
    if !props.show {
        return html! {};
    }

    // destructive, so it goes through the browser's confirm dialog
    let clear_history = {
        let cb = props.on_clear_history.clone();
        Callback::from(move |_: MouseEvent| {
            let confirmed = web_sys::window()
                .map(|w| w.confirm_with_message(CLEAR_CONFIRM).unwrap_or(false))
                .unwrap_or(true);
            if confirmed {
                cb.emit(());
            }
        })
    };

    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:340px; max-width:480px; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"Viewport Settings"}</h3>
                <button onclick={relay::<MouseEvent>(&props.on_close)} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <div style="display:flex; flex-direction:column; gap:10px;">
                <ToggleRow label="Show Axes" checked={props.show_axes} on_toggle={props.on_toggle_axes.clone()} />
                <ToggleRow label="Show Grid LOD Panel" checked={props.show_lod_panel} on_toggle={props.on_toggle_lod_panel.clone()} />
            </div>
            <button onclick={clear_history} style="background:#f85149; border:1px solid #b62324; color:#fff;">{"Clear History"}</button>
            <div style="font-size:11px; line-height:1.4; opacity:0.7;">{ format!("History is saved in this browser under `{}`.", props.history_key) }</div>
        </div>
    </div>}
}
