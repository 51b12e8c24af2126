mod app;
mod asset;

lib_app::app_main!(app::Demo);
