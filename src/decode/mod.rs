/// Raw simulation snapshot layout (`f32` header + column-major `f32` body).
pub mod raw;
