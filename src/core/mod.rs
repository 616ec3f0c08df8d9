pub mod backup;
pub mod calculator;
pub mod capture;
pub mod geo;
pub mod log;
pub mod recorder;
pub mod tareo;
