use crate::state::lod::{GridTier, TierOpacities};
use crate::util::format_distance;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LodPanelProps {
    pub show: bool,
    pub distance: f64,
    pub opacities: TierOpacities,
}

#[derive(Properties, PartialEq, Clone)]
struct TierRowProps {
    tier: GridTier,
    opacity: f64,
}

#[function_component]
fn TierRow(props: &TierRowProps) -> Html {
    let layout = props.tier.layout();
    let pct = (props.opacity / props.tier.max_opacity() * 100.0).clamp(0.0, 100.0);
    html! {<div style="display:flex; align-items:center; gap:8px; font-size:12px;">
        <span style={format!("width:10px; height:10px; border-radius:2px; background:{};", layout.color)}></span>
        <span style="width:56px;">{ props.tier.label() }</span>
        <div style="flex:1; height:6px; background:#0d1117; border-radius:3px; overflow:hidden;">
            <div style={format!("width:{:.0}%; height:100%; background:{};", pct, layout.color)}></div>
        </div>
        <span style="width:34px; text-align:right; font-variant-numeric:tabular-nums;">{ format!("{:.2}", props.opacity) }</span>
    </div>}
}

#[function_component]
pub fn LodPanel(props: &LodPanelProps) -> Html {
    if !props.show {
        return html! {};
    }
    html! {<div style="position:absolute; right:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:220px; display:flex; flex-direction:column; gap:4px;">
        <div style="font-weight:600; margin-bottom:4px;">{ format!("Grid LOD · distance {}", format_distance(props.distance)) }</div>
        { for props.opacities.iter().map(|(tier, opacity)| html!{ <TierRow tier={tier} opacity={opacity} /> }) }
    </div>}
}
