mod cdn_api;
mod client_factory;

pub use cdn_api::CdnApi;
pub use client_factory::ClientFactory;
