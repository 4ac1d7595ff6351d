/// Log-decade / linear scaling of grid values.
pub mod field;
