pub mod elements;
pub mod shannon;
pub mod species;
