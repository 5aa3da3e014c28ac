use std::sync::Mutex;

use crate::store::BookingStore;

pub struct AppState {
    pub store: Mutex<Box<dyn BookingStore>>,
}
