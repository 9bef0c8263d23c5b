pub mod border;
pub mod context;
pub mod debug_draw;
pub mod drawer;
pub mod font;
pub mod region;
pub mod styles;
pub mod text_wrapper;
