//! Headless orrery shell: directories, config, element-set loading and the
//! paced frame loop that drives the sky engine.

pub mod error;
pub mod frame_loop;
pub mod platform;
pub mod session;
