pub mod calendar_cache;
