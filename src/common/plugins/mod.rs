pub mod rewind;
