pub mod assessment;
pub mod month;
pub mod observation;
pub mod wetness;
pub mod window;
