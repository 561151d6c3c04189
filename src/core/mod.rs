pub mod canvas;
pub mod clock;
pub mod controller;
pub mod display_context;
pub mod frame;
pub mod gpu_context;
pub mod input_adapter;
pub mod surface_renderer;
pub mod timer;
pub mod window;
