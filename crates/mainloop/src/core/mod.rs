pub mod fps;
pub mod limiter;
pub mod mainloop;
pub mod time;
