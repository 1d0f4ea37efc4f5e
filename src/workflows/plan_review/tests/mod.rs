mod common;

mod narrative;
