use crate::util::relay;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CameraControlsProps {
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    pub on_orbit_left: Callback<()>,
    pub on_orbit_right: Callback<()>,
    pub on_orbit_up: Callback<()>,
    pub on_orbit_down: Callback<()>,
    pub on_reset: Callback<()>,
}

#[function_component(CameraControls)]
pub fn camera_controls(props: &CameraControlsProps) -> Html {
    let gap = html! { <span style="width:8px;"></span> };
    html! {<div style="position:absolute; left:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; gap:6px; align-items:center;">
        <button title="Zoom out" onclick={relay::<MouseEvent>(&props.on_zoom_out)}> {"-"} </button>
        <button title="Zoom in" onclick={relay::<MouseEvent>(&props.on_zoom_in)}> {"+"} </button>
        { gap.clone() }
        <button title="Orbit left" onclick={relay::<MouseEvent>(&props.on_orbit_left)}> {"⟲"} </button>
        <button title="Tilt up" onclick={relay::<MouseEvent>(&props.on_orbit_up)}> {"↑"} </button>
        <button title="Tilt down" onclick={relay::<MouseEvent>(&props.on_orbit_down)}> {"↓"} </button>
        <button title="Orbit right" onclick={relay::<MouseEvent>(&props.on_orbit_right)}> {"⟳"} </button>
        { gap }
        <button onclick={relay::<MouseEvent>(&props.on_reset)}> {"Reset View"} </button>
    </div>}
}
