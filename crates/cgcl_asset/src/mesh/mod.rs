pub mod assemble;
pub mod obj;
