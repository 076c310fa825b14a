mod components;
mod model;
mod scene;
mod state;
mod storage;
mod util;

use components::app::App;

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
