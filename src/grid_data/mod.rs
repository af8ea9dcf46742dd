pub mod dataset;
pub mod error;
pub mod select;

#[cfg(test)]
pub(crate) mod test_fixtures;
