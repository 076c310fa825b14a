use std::cell::RefCell;
use std::rc::Rc;

use super::viewport_view::ViewportView;
use crate::state::{HistoryKeys, HistoryStore, ViewportController};
use crate::storage::{KeyValueStore, LocalStore, MemoryStore};
use crate::util::cwarn;
use yew::prelude::*;

/// Everything the viewport needs for one page load: the controller (which owns
/// the history) and the store settings are read from.
#[derive(Clone)]
pub struct Session {
    pub controller: Rc<RefCell<ViewportController>>,
    pub store: Rc<dyn KeyValueStore>,
    pub startup_notice: Option<String>,
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.controller, &other.controller)
    }
}

fn open_session() -> Session {
    let (store, mut notice): (Rc<dyn KeyValueStore>, Option<String>) = match LocalStore::open() {
        Ok(s) => (Rc::new(s), None),
        Err(e) => {
            cwarn(&format!("Falling back to in-memory history: {}", e));
            (
                Rc::new(MemoryStore::new()),
                Some(format!("History will not survive a reload: {}", e)),
            )
        }
    };
    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default();
    let mut history = HistoryStore::load(store.clone(), HistoryKeys::from_path(&path));
    if let Some(e) = history.take_error() {
        notice.get_or_insert_with(|| format!("Saved history could not be read: {}", e));
    }
    Session {
        controller: Rc::new(RefCell::new(ViewportController::new(history))),
        store,
        startup_notice: notice,
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let session = use_memo((), |_| open_session());
    html! { <ViewportView session={(*session).clone()} /> }
}
