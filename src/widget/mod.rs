pub mod algonim;
pub mod sink;
pub mod slideshow;
