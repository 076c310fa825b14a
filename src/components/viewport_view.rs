use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};
use yew::prelude::*;

use super::app::Session;
use super::camera_controls::CameraControls;
use super::history_panel::HistoryPanel;
use super::lod_panel::LodPanel;
use super::notice_toast::NoticeToast;
use super::settings_modal::SettingsModal;
use crate::model::{HudAction, HudState};
use crate::scene::{DragGrip, Scene};
use crate::state::ViewportController;
use crate::state::gesture::DragOutcome;
use crate::state::shortcuts::{self, KeyInput};
use crate::storage::{load_flag, save_flag};
use crate::util::{clog, cwarn};

const SHOW_AXES_KEY: &str = "cv_setting_show_axes";
const SHOW_LOD_PANEL_KEY: &str = "cv_setting_show_lod_panel";
const BUTTON_ZOOM_FACTOR: f64 = 1.25;
const BUTTON_ORBIT_PX: f64 = 60.0;

#[derive(Properties, PartialEq, Clone)]
pub struct ViewportViewProps {
    pub session: Session,
}

type SceneRef = Rc<RefCell<Scene>>;
type ControllerRef = Rc<RefCell<ViewportController>>;
type GripRef = Rc<RefCell<Option<DragGrip>>>;

fn canvas_point(canvas: &HtmlCanvasElement, e: &MouseEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (e.client_x() as f64 - rect.left(), e.client_y() as f64 - rect.top())
}

fn fit_canvas(canvas: &HtmlCanvasElement, window: &web_sys::Window, scene: &RefCell<Scene>) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0)
        .max(1.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0)
        .max(1.0);
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    scene.borrow_mut().camera.set_viewport(width, height);
}

/// Wire the canvas to the controller: render loop plus pointer, wheel, key and
/// focus listeners. Returns the teardown, or `None` when the canvas is missing.
fn mount_viewport(
    canvas_ref: NodeRef,
    scene: SceneRef,
    controller: ControllerRef,
    grip: GripRef,
    hud: UseReducerHandle<HudState>,
) -> Option<Box<dyn FnOnce()>> {
    let window = web_sys::window()?;
    let canvas: HtmlCanvasElement = canvas_ref.cast::<HtmlCanvasElement>()?;
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;

    fit_canvas(&canvas, &window, &scene);
    controller.borrow_mut().mount(&mut *scene.borrow_mut());

    // Draw closure
    let draw: Rc<dyn Fn()> = {
        let canvas = canvas.clone();
        let scene = scene.clone();
        let controller = controller.clone();
        let hud = hud.clone();
        Rc::new(move || {
            if !canvas.is_connected() {
                return;
            }
            let (snapshot, error) = {
                let mut sc = scene.borrow_mut();
                let mut ctl = controller.borrow_mut();
                ctl.frame(&mut *sc);
                sc.highlight = ctl.is_dragging();
                sc.draw(&ctx);
                (
                    ctl.hud_snapshot(sc.camera.distance_to_origin()),
                    ctl.take_storage_error(),
                )
            };
            hud.dispatch(HudAction::Sync(snapshot));
            if let Some(e) = error {
                cwarn(&format!("History write failed: {}", e));
                hud.dispatch(HudAction::Notice(format!("Latest change was not saved: {}", e)));
            }
        })
    };
    draw();

    // RAF loop
    let raf_id = Rc::new(RefCell::new(None));
    let raf_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    {
        let raf_id_loop = raf_id.clone();
        let raf_cell_loop = raf_cell.clone();
        let window_loop = window.clone();
        let draw = draw.clone();
        *raf_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            draw();
            if let Some(cb) = raf_cell_loop.borrow().as_ref() {
                if let Ok(id) = window_loop.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    *raf_id_loop.borrow_mut() = Some(id);
                }
            }
        }) as Box<dyn FnMut()>));
    }
    if let Some(cb) = raf_cell.borrow().as_ref() {
        if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            *raf_id.borrow_mut() = Some(id);
        }
    }

    let mousedown_cb = {
        let canvas_md = canvas.clone();
        let scene = scene.clone();
        let controller = controller.clone();
        let grip = grip.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            let (sx, sy) = canvas_point(&canvas_md, &e);
            let mut sc = scene.borrow_mut();
            match e.button() {
                0 => {
                    if sc.hit_object(sx, sy) {
                        let mut ctl = controller.borrow_mut();
                        let start = DragGrip::begin(&sc.camera, ctl.displayed_transform(), sx, sy, e.shift_key());
                        if let Some(g) = start {
                            if ctl.begin_drag() {
                                *grip.borrow_mut() = Some(g);
                                e.prevent_default();
                                return;
                            }
                        }
                    }
                    sc.camera.orbiting = true;
                }
                2 => sc.camera.panning = true,
                _ => return,
            }
            sc.camera.last_x = e.client_x() as f64;
            sc.camera.last_y = e.client_y() as f64;
        }) as Box<dyn FnMut(_)>)
    };
    canvas
        .add_event_listener_with_callback("mousedown", mousedown_cb.as_ref().unchecked_ref())
        .ok();

    let mousemove_cb = {
        let canvas_mm = canvas.clone();
        let scene = scene.clone();
        let controller = controller.clone();
        let grip = grip.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            let active = *grip.borrow();
            if let Some(g) = active {
                let mut sc = scene.borrow_mut();
                let mut ctl = controller.borrow_mut();
                if e.buttons() & 1 == 0 {
                    // button released outside the window
                    let last = ctl.drag_preview().unwrap_or(g.anchor);
                    let outcome = ctl.end_drag(last, &mut *sc);
                    clog(&format!("Drag ended without mouseup: {:?}", outcome));
                    *grip.borrow_mut() = None;
                    return;
                }
                let (sx, sy) = canvas_point(&canvas_mm, &e);
                if let Some(t) = g.transform_at(&sc.camera, sx, sy) {
                    ctl.drag_to(t, &mut *sc);
                }
                return;
            }
            let mut sc = scene.borrow_mut();
            let cam = &mut sc.camera;
            if !(cam.orbiting || cam.panning) {
                return;
            }
            if e.buttons() == 0 {
                cam.orbiting = false;
                cam.panning = false;
                return;
            }
            let x = e.client_x() as f64;
            let y = e.client_y() as f64;
            let (dx, dy) = (x - cam.last_x, y - cam.last_y);
            cam.last_x = x;
            cam.last_y = y;
            if cam.orbiting {
                cam.orbit(dx, dy);
            } else {
                cam.pan(dx, dy);
            }
        }) as Box<dyn FnMut(_)>)
    };
    window
        .add_event_listener_with_callback("mousemove", mousemove_cb.as_ref().unchecked_ref())
        .ok();

    let mouseup_cb = {
        let canvas_mu = canvas.clone();
        let scene = scene.clone();
        let controller = controller.clone();
        let grip = grip.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            let taken = grip.borrow_mut().take();
            let mut sc = scene.borrow_mut();
            if let Some(g) = taken {
                let mut ctl = controller.borrow_mut();
                let (sx, sy) = canvas_point(&canvas_mu, &e);
                let release = g
                    .transform_at(&sc.camera, sx, sy)
                    .or_else(|| ctl.drag_preview())
                    .unwrap_or(g.anchor);
                let outcome = ctl.end_drag(release, &mut *sc);
                clog(&format!("Drag end: {:?}", outcome));
            }
            sc.camera.orbiting = false;
            sc.camera.panning = false;
        }) as Box<dyn FnMut(_)>)
    };
    window
        .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
        .ok();

    let blur_cb = {
        let scene = scene.clone();
        let controller = controller.clone();
        let grip = grip.clone();
        Closure::wrap(Box::new(move |_e: web_sys::Event| {
            grip.borrow_mut().take();
            let mut sc = scene.borrow_mut();
            let outcome = controller.borrow_mut().abandon_drag(&mut *sc);
            if outcome != DragOutcome::NotDragging {
                clog(&format!("Drag abandoned on blur: {:?}", outcome));
            }
            sc.camera.orbiting = false;
            sc.camera.panning = false;
        }) as Box<dyn FnMut(_)>)
    };
    window
        .add_event_listener_with_callback("blur", blur_cb.as_ref().unchecked_ref())
        .ok();

    let keydown_cb = {
        let scene = scene.clone();
        let controller = controller.clone();
        Closure::wrap(Box::new(move |e: KeyboardEvent| {
            let input = KeyInput::from_event(&e);
            if shortcuts::resolve(&input).is_none() {
                return;
            }
            // keep the browser's own undo out of it, repeats included
            e.prevent_default();
            let mut sc = scene.borrow_mut();
            controller.borrow_mut().key_down(&input, &mut *sc);
        }) as Box<dyn FnMut(_)>)
    };
    window
        .add_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref())
        .ok();

    let wheel_cb = {
        let scene = scene.clone();
        Closure::wrap(Box::new(move |e: WheelEvent| {
            e.prevent_default();
            scene.borrow_mut().camera.dolly(e.delta_y());
        }) as Box<dyn FnMut(_)>)
    };
    canvas
        .add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref())
        .ok();

    let contextmenu_cb = Closure::wrap(Box::new(move |e: web_sys::Event| {
        e.prevent_default();
    }) as Box<dyn FnMut(_)>);
    canvas
        .add_event_listener_with_callback("contextmenu", contextmenu_cb.as_ref().unchecked_ref())
        .ok();

    let resize_cb = {
        let canvas_rs = canvas.clone();
        let window_rs = window.clone();
        let scene = scene.clone();
        let draw = draw.clone();
        Closure::wrap(Box::new(move |_e: web_sys::Event| {
            fit_canvas(&canvas_rs, &window_rs, &scene);
            draw();
        }) as Box<dyn FnMut(_)>)
    };
    window
        .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
        .ok();

    // Cleanup
    Some(Box::new(move || {
        let _ = canvas.remove_event_listener_with_callback("mousedown", mousedown_cb.as_ref().unchecked_ref());
        let _ = canvas.remove_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref());
        let _ = canvas.remove_event_listener_with_callback("contextmenu", contextmenu_cb.as_ref().unchecked_ref());
        let _ = window.remove_event_listener_with_callback("mousemove", mousemove_cb.as_ref().unchecked_ref());
        let _ = window.remove_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref());
        let _ = window.remove_event_listener_with_callback("blur", blur_cb.as_ref().unchecked_ref());
        let _ = window.remove_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref());
        let _ = window.remove_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());
        if let Some(id) = raf_id.borrow_mut().take() {
            let _ = window.cancel_animation_frame(id);
        }
        // the loop closure holds its own cell; break the cycle
        raf_cell.borrow_mut().take();
    }))
}

#[function_component(ViewportView)]
pub fn viewport_view(props: &ViewportViewProps) -> Html {
    let session = props.session.clone();
    let canvas_ref = use_node_ref();
    let scene = use_mut_ref(Scene::default);
    let grip = use_mut_ref(|| None::<DragGrip>);
    let hud = use_reducer(HudState::default);
    let open_settings = use_state(|| false);
    let show_axes = {
        let store = session.store.clone();
        use_state(move || load_flag(store.as_ref(), SHOW_AXES_KEY, true))
    };
    let show_lod_panel = {
        let store = session.store.clone();
        use_state(move || load_flag(store.as_ref(), SHOW_LOD_PANEL_KEY, true))
    };

    // Startup notice (storage fallback or unreadable history)
    {
        let hud = hud.clone();
        let notice = session.startup_notice.clone();
        use_effect_with((), move |_| {
            if let Some(msg) = notice {
                hud.dispatch(HudAction::Notice(msg));
            }
            || ()
        });
    }
    // Persist settings
    {
        let scene = scene.clone();
        let store = session.store.clone();
        let flag = *show_axes;
        use_effect_with(flag, move |_| {
            scene.borrow_mut().show_axes = flag;
            if let Err(e) = save_flag(store.as_ref(), SHOW_AXES_KEY, flag) {
                cwarn(&e.to_string());
            }
            || ()
        });
    }
    {
        let store = session.store.clone();
        let flag = *show_lod_panel;
        use_effect_with(flag, move |_| {
            if let Err(e) = save_flag(store.as_ref(), SHOW_LOD_PANEL_KEY, flag) {
                cwarn(&e.to_string());
            }
            || ()
        });
    }
    {
        let canvas_ref = canvas_ref.clone();
        let scene = scene.clone();
        let controller = session.controller.clone();
        let grip = grip.clone();
        let hud = hud.clone();
        use_effect_with((), move |_| {
            let cleanup = mount_viewport(canvas_ref, scene, controller, grip, hud);
            if cleanup.is_none() {
                cwarn("Viewport canvas unavailable; nothing will render");
            }
            move || {
                if let Some(cleanup) = cleanup {
                    cleanup();
                }
            }
        });
    }

    let on_undo = {
        let scene = scene.clone();
        let controller = session.controller.clone();
        Callback::from(move |_| {
            controller.borrow_mut().undo(&mut *scene.borrow_mut());
        })
    };
    let on_redo = {
        let scene = scene.clone();
        let controller = session.controller.clone();
        Callback::from(move |_| {
            controller.borrow_mut().redo(&mut *scene.borrow_mut());
        })
    };
    let camera_cb = |f: fn(&mut Scene)| {
        let scene = scene.clone();
        Callback::from(move |_: ()| f(&mut scene.borrow_mut()))
    };
    let on_zoom_in = camera_cb(|s| s.camera.zoom_by(1.0 / BUTTON_ZOOM_FACTOR));
    let on_zoom_out = camera_cb(|s| s.camera.zoom_by(BUTTON_ZOOM_FACTOR));
    let on_orbit_left = camera_cb(|s| s.camera.orbit(-BUTTON_ORBIT_PX, 0.0));
    let on_orbit_right = camera_cb(|s| s.camera.orbit(BUTTON_ORBIT_PX, 0.0));
    let on_orbit_up = camera_cb(|s| s.camera.orbit(0.0, -BUTTON_ORBIT_PX));
    let on_orbit_down = camera_cb(|s| s.camera.orbit(0.0, BUTTON_ORBIT_PX));
    let on_reset_view = camera_cb(|s| s.camera.reset());

    let on_open_settings = {
        let open_settings = open_settings.clone();
        Callback::from(move |_| open_settings.set(true))
    };
    let on_close_settings = {
        let open_settings = open_settings.clone();
        Callback::from(move |_| open_settings.set(false))
    };
    let on_toggle_axes = {
        let show_axes = show_axes.clone();
        Callback::from(move |_| show_axes.set(!*show_axes))
    };
    let on_toggle_lod_panel = {
        let show_lod_panel = show_lod_panel.clone();
        Callback::from(move |_| show_lod_panel.set(!*show_lod_panel))
    };
    let on_clear_history = {
        let scene = scene.clone();
        let controller = session.controller.clone();
        let open_settings = open_settings.clone();
        Callback::from(move |_| {
            controller.borrow_mut().reset_history(&mut *scene.borrow_mut());
            open_settings.set(false);
        })
    };
    let on_dismiss = {
        let hud = hud.clone();
        Callback::from(move |_| hud.dispatch(HudAction::DismissNotice))
    };

    let snap = hud.snapshot.clone();
    let history_key = session.controller.borrow().history().keys().sequence.clone();
    html! {<div style="position:fixed; inset:0; overflow:hidden; background:#0e1116; color:#e6edf3; font-family:system-ui, sans-serif;">
        <canvas ref={canvas_ref} style="display:block; width:100%; height:100%; cursor:default;"></canvas>
        <HistoryPanel
            cursor={snap.cursor}
            len={snap.history_len}
            current={snap.current}
            dragging={snap.dragging}
            can_undo={snap.can_undo}
            can_redo={snap.can_redo}
            on_undo={on_undo}
            on_redo={on_redo}
            on_open_settings={on_open_settings}
        />
        <LodPanel show={*show_lod_panel} distance={snap.camera_distance} opacities={snap.opacities} />
        <CameraControls
            on_zoom_in={on_zoom_in}
            on_zoom_out={on_zoom_out}
            on_orbit_left={on_orbit_left}
            on_orbit_right={on_orbit_right}
            on_orbit_up={on_orbit_up}
            on_orbit_down={on_orbit_down}
            on_reset={on_reset_view}
        />
        <SettingsModal
            show={*open_settings}
            on_close={on_close_settings}
            show_axes={*show_axes}
            on_toggle_axes={on_toggle_axes}
            show_lod_panel={*show_lod_panel}
            on_toggle_lod_panel={on_toggle_lod_panel}
            on_clear_history={on_clear_history}
            history_key={history_key}
        />
        <NoticeToast message={hud.notice.clone()} on_dismiss={on_dismiss} />
    </div>}
}
