pub mod attendance;
pub mod geo;
pub mod hours;
pub mod project;
pub mod tareo;
pub mod worker;
