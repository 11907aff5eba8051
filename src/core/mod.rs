pub mod app;
pub mod appearance;
pub mod config;
pub mod keyring;
pub mod message;
pub mod model_client;
pub mod persona;
pub mod settings;
pub mod store;
pub mod tags;
