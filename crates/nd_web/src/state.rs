use crate::page::Homepage;

pub struct AppState {
    pub homepage: Homepage,
}
