//! Record processing: turning flat provider records into segment tries.

mod builder;

pub use builder::build_segments;
