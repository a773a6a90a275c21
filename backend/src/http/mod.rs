mod cors;
mod server;

pub use cors::CorsPolicy;
pub use server::serve;
