pub mod clear;
pub mod fetch;
pub mod info;
pub mod settings;
pub mod show;
