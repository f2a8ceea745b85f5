use contracts::system::profile::selected_shop_storage_key;
use web_sys::window;

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

pub fn load_selected_shop(user_id: &str) -> Option<String> {
    get_local_storage()?
        .get_item(&selected_shop_storage_key(user_id))
        .ok()?
}

pub fn save_selected_shop(user_id: &str, shop: &str) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(&selected_shop_storage_key(user_id), shop);
    }
}
