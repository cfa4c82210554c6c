use shared::models::CurrentUser;
use yewdux::Store;

#[derive(Default, Clone, PartialEq, Store)]
pub struct AppState {
    pub current_user: Option<CurrentUser>,
}

impl AppState {
    pub fn current_user_id(&self) -> Option<&str> {
        self.current_user.as_ref().map(|user| user.id.as_str())
    }
}
