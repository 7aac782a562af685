pub mod filenames;
pub mod mime;
