mod app;
mod dom;
mod net;
mod persistence;
mod render;
mod session;
mod ws;

pub use app::run;
