pub mod quickjs;
