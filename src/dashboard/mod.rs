pub mod page;
pub mod pipeline;
pub mod render;
pub mod server;
