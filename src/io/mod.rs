pub mod obj;

pub use obj::{export_obj, save_obj, write_obj};
