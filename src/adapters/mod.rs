pub mod privileges;
pub mod resolver;
