use contracts::system::auth::Session;
use web_sys::window;

const SESSION_KEY: &str = "auth_session";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Persist the session so a reload can restore it
pub fn save_session(session: &Session) {
    let Ok(json) = serde_json::to_string(session) else {
        return;
    };
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(SESSION_KEY, &json);
    }
}

/// Stored session, if any and still parseable
pub fn load_session() -> Option<Session> {
    let json = get_local_storage()?.get_item(SESSION_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

pub fn clear_session() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(SESSION_KEY);
    }
}
