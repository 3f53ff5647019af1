pub mod color;
pub mod compositor;
pub mod contents_json;
pub mod font;
pub mod icon_gen;
pub mod moods;
