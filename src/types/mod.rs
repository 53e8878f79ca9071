pub mod blackout_window;
pub mod event;
