pub mod callback_counter;
pub mod contract;
pub mod ica_controller;
pub mod owner;
