use localic_std::errors::LocalError;

pub mod accounts;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod file_system;
pub mod ibc;
pub mod polling;
pub mod queries;
pub mod setup;
pub mod test_context;
pub mod types;

pub fn custom_error(msg: impl ToString) -> LocalError {
    LocalError::Custom {
        msg: msg.to_string(),
    }
}
