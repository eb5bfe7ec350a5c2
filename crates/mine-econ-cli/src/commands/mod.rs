pub mod districts;
pub mod economics;
pub mod esg;
pub mod resource;
pub mod screening;
