use gloo_storage::{LocalStorage, Storage};
use pinboard_client::api::{ArtifactId, UserId};

mod api;
mod dom;
mod ui;

lazy_static::lazy_static! {
    pub static ref CLIENT: reqwest::Client = reqwest::Client::new();
}

const KEY_SESSION: &str = "pinboard-session";

/// Identity fact supplied by the surrounding page: who is looking at
/// which artifact, and whether they own its discussion.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Session {
    pub host: String,
    pub artifact: ArtifactId,
    pub user: UserId,
    pub user_name: String,
    pub is_owner: bool,
}

fn main() {
    tracing_wasm::set_as_global_default();
    match LocalStorage::get(KEY_SESSION) {
        Ok(session) => {
            yew::Renderer::<ui::App>::with_props(ui::AppProps { session }).render();
        }
        Err(e) => {
            // the host page failed to provision us; stay out of its way
            tracing::error!("no annotation session in local storage: {e}");
        }
    }
}
