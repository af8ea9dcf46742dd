pub mod location;
pub mod variable;
