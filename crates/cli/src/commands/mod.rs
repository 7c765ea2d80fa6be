pub mod lookup;

pub use lookup::handle_lookup_command;
