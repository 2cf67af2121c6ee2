pub mod affordance;
pub mod controller;
pub mod status;
