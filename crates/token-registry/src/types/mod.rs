pub mod descriptor;
pub mod entry;
