pub mod client;
pub(crate) mod models;

pub use client::{read_client_id, SoundCloudClient, SoundCloudClientBuilder};
